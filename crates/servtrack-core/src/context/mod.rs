//! Client-side access to time tracking records.
//!
//! [`TimeTrackingContext`] wraps a [`TimeTrackingService`] and caches what it
//! returns. Services exist for the HTTP API ([`HttpTimeTrackingService`]) and
//! for an embedded database ([`crate::services::DatabaseService`]).

mod http;
mod in_flight;
mod service;
mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use http::HttpTimeTrackingService;
pub use in_flight::{InFlightGuard, InFlightRequest, InFlightTracker, Operation, RequestId};
pub use service::{ServiceError, ServiceResult, TimeTrackingService};
pub use store::{ContextError, ContextResult, TimeTrackingContext};
