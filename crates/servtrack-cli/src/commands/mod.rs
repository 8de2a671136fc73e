pub mod common;
pub mod list;
pub mod note;
pub mod show;
pub mod start;
pub mod stop;
