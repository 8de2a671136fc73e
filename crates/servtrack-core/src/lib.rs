//! servtrack-core - Core library for servtrack
//!
//! This crate contains the shared models, database layer, wire envelopes and
//! client context used by all servtrack interfaces (API server, CLI).

pub mod context;
pub mod db;
pub mod envelope;
pub mod error;
pub mod models;
pub mod resource;
pub mod services;
pub mod util;
pub mod view;

pub use context::{HttpTimeTrackingService, TimeTrackingContext, TimeTrackingService};
pub use envelope::{DataResponse, ErrorCode, ErrorEnvelope};
pub use error::{Error, Result};
pub use models::{
    ClientEntity, NewTimeTracking, TimeTracking, TimeTrackingId, TimeTrackingPatch,
    TimeTrackingStatus,
};
pub use resource::{TimeTrackingEntity, TimeTrackingResource};
pub use services::DatabaseService;
