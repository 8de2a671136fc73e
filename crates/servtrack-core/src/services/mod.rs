//! Application services
//!
//! Shared handle over the time tracking database.

mod database;

pub use database::DatabaseService;
