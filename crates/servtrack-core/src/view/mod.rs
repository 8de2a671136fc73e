//! Consumers of the time tracking context.

mod lookup;
mod service_employee;

pub use lookup::{ClientLookup, HttpClientLookup};
pub use service_employee::{ServiceEmployeeView, SkipReason, StopOutcome};
