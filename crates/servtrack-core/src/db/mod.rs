//! Database layer for servtrack

mod connection;
mod migrations;
mod repository;

pub use connection::{Database, IN_MEMORY_PATH};
pub use repository::{LibSqlTimeTrackingRepository, TimeTrackingRepository};
