//! Data models for servtrack

mod client;
mod time_tracking;

pub use client::ClientEntity;
pub use time_tracking::{
    NewTimeTracking, TimeTracking, TimeTrackingId, TimeTrackingPatch, TimeTrackingStatus,
    ValidationErrors,
};
