//! Client-side cache of time tracking records.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::in_flight::{InFlightGuard, InFlightRequest, InFlightTracker, Operation};
use super::service::{ServiceError, TimeTrackingService};
use crate::envelope::ErrorCode;
use crate::models::{NewTimeTracking, TimeTrackingId, TimeTrackingPatch};
use crate::resource::TimeTrackingEntity;

/// A context operation that the service rejected or could not complete.
#[derive(Debug, Error)]
#[error("Failed to {operation}: {source}")]
pub struct ContextError {
    pub operation: Operation,
    #[source]
    pub source: ServiceError,
}

impl ContextError {
    pub fn code(&self) -> ErrorCode {
        self.source.code()
    }
}

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(Debug, Default)]
struct ContextState {
    time_tracking: Vec<TimeTrackingEntity>,
    current: Option<TimeTrackingEntity>,
}

struct Inner<S> {
    service: S,
    state: Mutex<ContextState>,
    in_flight: Arc<InFlightTracker>,
}

/// Shared handle over a [`TimeTrackingService`] and the records it returned.
///
/// Clones share state. Construct one per session and hand it to consumers.
pub struct TimeTrackingContext<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for TimeTrackingContext<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> TimeTrackingContext<S> {
    pub fn new(service: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                state: Mutex::new(ContextState::default()),
                in_flight: InFlightTracker::new(),
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.inner.service
    }

    /// Cached list, as of the last successful fetch.
    pub fn time_tracking(&self) -> Vec<TimeTrackingEntity> {
        self.state().time_tracking.clone()
    }

    /// Record returned by the last successful create or update.
    pub fn current_time_tracking(&self) -> Option<TimeTrackingEntity> {
        self.state().current.clone()
    }

    /// True while any request is awaiting the service.
    pub fn loading(&self) -> bool {
        !self.inner.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> Vec<InFlightRequest> {
        self.inner.in_flight.snapshot()
    }

    pub fn records_for_client(&self, client_id: &str) -> Vec<TimeTrackingEntity> {
        self.filtered(|record| record.client_id == client_id)
    }

    pub fn records_for_employee(&self, employee_id: &str) -> Vec<TimeTrackingEntity> {
        self.filtered(|record| record.employee_id == employee_id)
    }

    pub fn active_records(&self) -> Vec<TimeTrackingEntity> {
        self.filtered(|record| !record.is_concluded())
    }

    pub fn find_record(&self, id: &TimeTrackingId) -> Option<TimeTrackingEntity> {
        self.state()
            .time_tracking
            .iter()
            .find(|record| record.id == *id)
            .cloned()
    }

    fn filtered(&self, keep: impl Fn(&TimeTrackingEntity) -> bool) -> Vec<TimeTrackingEntity> {
        self.state()
            .time_tracking
            .iter()
            .filter(|record| keep(record))
            .cloned()
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, operation: Operation) -> InFlightGuard {
        self.inner.in_flight.begin(operation)
    }
}

fn failed(operation: Operation, source: ServiceError) -> ContextError {
    tracing::error!(
        operation = %operation,
        code = %source.code(),
        "Error in time tracking context: {source}"
    );
    ContextError { operation, source }
}

impl<S: TimeTrackingService> TimeTrackingContext<S> {
    /// Load every record, replacing the cached list.
    pub async fn fetch_time_tracking(&self) -> ContextResult<Vec<TimeTrackingEntity>> {
        let _request = self.begin(Operation::FetchAll);
        let records = self
            .inner
            .service
            .get_all()
            .await
            .map_err(|source| failed(Operation::FetchAll, source))?;
        Ok(self.replace_list(records))
    }

    /// Load one client's records, replacing the cached list.
    pub async fn fetch_time_tracking_by_client(
        &self,
        client_id: &str,
    ) -> ContextResult<Vec<TimeTrackingEntity>> {
        let _request = self.begin(Operation::FetchByClient);
        let records = self
            .inner
            .service
            .get_by_client(client_id)
            .await
            .map_err(|source| failed(Operation::FetchByClient, source))?;
        Ok(self.replace_list(records))
    }

    /// Load one employee's records, replacing the cached list.
    pub async fn fetch_time_tracking_by_employee(
        &self,
        employee_id: &str,
    ) -> ContextResult<Vec<TimeTrackingEntity>> {
        let _request = self.begin(Operation::FetchByEmployee);
        let records = self
            .inner
            .service
            .get_by_employee(employee_id)
            .await
            .map_err(|source| failed(Operation::FetchByEmployee, source))?;
        Ok(self.replace_list(records))
    }

    /// Fetch a single record. Cached state is left alone either way.
    pub async fn get_time_tracking_by_id(&self, id: &str) -> ContextResult<TimeTrackingEntity> {
        let _request = self.begin(Operation::GetById);
        self.inner
            .service
            .get_by_id(id)
            .await
            .map_err(|source| failed(Operation::GetById, source))
    }

    /// Create a record, make it current, then refresh the list.
    pub async fn create_time_tracking(
        &self,
        data: &NewTimeTracking,
    ) -> ContextResult<TimeTrackingEntity> {
        let _request = self.begin(Operation::Create);
        let created = self
            .inner
            .service
            .create(data)
            .await
            .map_err(|source| failed(Operation::Create, source))?;
        tracing::info!(
            id = %created.id,
            employee_id = %created.employee_id,
            client_id = %created.client_id,
            "Time tracking started"
        );

        self.state().current = Some(created.clone());
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Apply a partial update, make the result current, then refresh the list.
    pub async fn update_time_tracking(
        &self,
        id: &str,
        patch: &TimeTrackingPatch,
    ) -> ContextResult<TimeTrackingEntity> {
        let _request = self.begin(Operation::Update);
        let updated = self
            .inner
            .service
            .update(id, patch)
            .await
            .map_err(|source| failed(Operation::Update, source))?;
        tracing::info!(id = %updated.id, status = %updated.status, "Time tracking updated");

        self.state().current = Some(updated.clone());
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    async fn refresh_after_mutation(&self) {
        // The mutation already succeeded; a stale list is reported, not returned
        if let Err(error) = self.fetch_time_tracking().await {
            tracing::warn!("List refresh after mutation failed: {error}");
        }
    }

    fn replace_list(&self, records: Vec<TimeTrackingEntity>) -> Vec<TimeTrackingEntity> {
        tracing::debug!(count = records.len(), "Time tracking list replaced");
        self.state().time_tracking.clone_from(&records);
        records
    }
}
