//! Service doubles shared by context and view tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use super::service::{ServiceError, ServiceResult, TimeTrackingService};
use crate::envelope::{ErrorCode, ErrorEnvelope};
use crate::models::{NewTimeTracking, TimeTrackingPatch};
use crate::resource::TimeTrackingEntity;
use crate::services::DatabaseService;

/// Embedded service with switches for failures and a gate on `get_by_id`.
pub struct FakeService {
    inner: DatabaseService,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    gate: Option<Arc<Notify>>,
    update_calls: AtomicUsize,
}

impl FakeService {
    pub async fn new() -> Self {
        Self {
            inner: DatabaseService::open_in_memory().await.unwrap(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            gate: None,
            update_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub const fn database(&self) -> &DatabaseService {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool) -> ServiceResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(ServiceError::Api {
                status: 503,
                envelope: ErrorEnvelope::new(ErrorCode::Remote, "Service unavailable"),
            });
        }
        Ok(())
    }
}

impl TimeTrackingService for FakeService {
    async fn get_all(&self) -> ServiceResult<Vec<TimeTrackingEntity>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_all().await
    }

    async fn get_by_client(&self, client_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_by_client(client_id).await
    }

    async fn get_by_employee(&self, employee_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_by_employee(employee_id).await
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<TimeTrackingEntity> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Self::check(&self.fail_reads)?;
        self.inner.get_by_id(id).await
    }

    async fn create(&self, data: &NewTimeTracking) -> ServiceResult<TimeTrackingEntity> {
        Self::check(&self.fail_writes)?;
        self.inner.create(data).await
    }

    async fn update(
        &self,
        id: &str,
        patch: &TimeTrackingPatch,
    ) -> ServiceResult<TimeTrackingEntity> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_writes)?;
        self.inner.update(id, patch).await
    }
}
