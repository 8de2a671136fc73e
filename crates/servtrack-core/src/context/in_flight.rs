//! Per-request tracking for context operations.
//!
//! Every call into the service registers itself for as long as it runs.
//! The context is loading while at least one request is registered, so
//! overlapping calls never clear each other's state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Context operation that talks to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchAll,
    FetchByClient,
    FetchByEmployee,
    GetById,
    Create,
    Update,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchAll => "fetch time tracking",
            Self::FetchByClient => "fetch time tracking by client",
            Self::FetchByEmployee => "fetch time tracking by employee",
            Self::GetById => "get time tracking",
            Self::Create => "create time tracking",
            Self::Update => "update time tracking",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlightRequest {
    pub id: RequestId,
    pub operation: Operation,
}

/// Set of requests currently awaiting the service.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    next_id: AtomicU64,
    requests: Mutex<BTreeMap<RequestId, Operation>>,
}

impl InFlightTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a request; it stays in flight until the guard drops.
    pub fn begin(self: &Arc<Self>, operation: Operation) -> InFlightGuard {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, operation);
        tracing::trace!("{operation} {id} started");
        InFlightGuard {
            tracker: Arc::clone(self),
            id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// In-flight requests, oldest first.
    pub fn snapshot(&self) -> Vec<InFlightRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, operation)| InFlightRequest {
                id: *id,
                operation: *operation,
            })
            .collect()
    }

    fn finish(&self, id: RequestId) {
        let removed = self
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if let Some(operation) = removed {
            tracing::trace!("{operation} {id} finished");
        }
    }
}

/// Keeps one request registered. Dropping it (on success, failure or
/// cancellation) removes the request.
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: Arc<InFlightTracker>,
    id: RequestId,
}

impl InFlightGuard {
    pub const fn id(&self) -> RequestId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.finish(self.id);
    }
}
