//! The field employee's view of one service visit.
//!
//! Loads a single record once, resolves its client, and offers a guarded
//! stop action that is never sent for a visit already concluded.

use std::fmt;

use chrono::{DateTime, Utc};

use super::lookup::ClientLookup;
use crate::context::{ContextError, ContextResult, TimeTrackingContext, TimeTrackingService};
use crate::models::{ClientEntity, TimeTrackingPatch};
use crate::resource::TimeTrackingEntity;

/// Why a stop request was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingServiceId,
    MissingRecord,
    AlreadyConcluded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingServiceId => "service id is required",
            Self::MissingRecord => "time tracking record is not loaded",
            Self::AlreadyConcluded => "service is already concluded",
        })
    }
}

#[derive(Debug)]
pub enum StopOutcome {
    Stopped(TimeTrackingEntity),
    Skipped(SkipReason),
    Failed(ContextError),
}

pub struct ServiceEmployeeView<S, L> {
    service_id: String,
    context: TimeTrackingContext<S>,
    lookup: L,
    fetched: bool,
    time_tracking: Option<TimeTrackingEntity>,
    client: Option<ClientEntity>,
    stop_time: Option<DateTime<Utc>>,
}

impl<S, L> ServiceEmployeeView<S, L>
where
    S: TimeTrackingService,
    L: ClientLookup,
{
    pub fn new(service_id: impl Into<String>, context: TimeTrackingContext<S>, lookup: L) -> Self {
        Self {
            service_id: service_id.into().trim().to_string(),
            context,
            lookup,
            fetched: false,
            time_tracking: None,
            client: None,
            stop_time: None,
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// A view without a service id shows an error instead of loading.
    pub fn service_id_missing(&self) -> bool {
        self.service_id.is_empty()
    }

    pub fn loading(&self) -> bool {
        self.context.loading()
    }

    pub const fn time_tracking(&self) -> Option<&TimeTrackingEntity> {
        self.time_tracking.as_ref()
    }

    pub const fn client(&self) -> Option<&ClientEntity> {
        self.client.as_ref()
    }

    /// When this view sent the stop, if it did.
    pub const fn stop_time(&self) -> Option<DateTime<Utc>> {
        self.stop_time
    }

    pub fn is_concluded(&self) -> bool {
        self.time_tracking
            .as_ref()
            .is_some_and(TimeTrackingEntity::is_concluded)
    }

    /// Fetch the record and its client. Only the first call does any work.
    ///
    /// A failed record fetch leaves the view empty and is handed back so
    /// callers can report its code. Client lookup failures are only logged.
    pub async fn load(&mut self) -> ContextResult<()> {
        if self.fetched || self.service_id_missing() {
            return Ok(());
        }
        self.fetched = true;

        let record = self
            .context
            .get_time_tracking_by_id(&self.service_id)
            .await?;
        let client_id = record.client_id.clone();
        self.time_tracking = Some(record);
        self.resolve_client(&client_id).await;
        Ok(())
    }

    async fn resolve_client(&mut self, client_id: &str) {
        if client_id.is_empty() || !self.lookup.is_configured() {
            tracing::debug!(client_id, "Skipping client lookup");
            return;
        }
        match self.lookup.get_user_by_id(client_id).await {
            Ok(client) => self.client = Some(client),
            Err(error) => {
                tracing::warn!(client_id, "Error fetching client data: {error}");
            }
        }
    }

    /// Conclude the visit at `now`, unless there is nothing to stop.
    ///
    /// End coordinates, when given, travel in the same update as the stop.
    pub async fn handle_stop(
        &mut self,
        now: DateTime<Utc>,
        end_location: Option<(f64, f64)>,
    ) -> StopOutcome {
        if self.service_id_missing() {
            return StopOutcome::Skipped(SkipReason::MissingServiceId);
        }
        let Some(record) = &self.time_tracking else {
            return StopOutcome::Skipped(SkipReason::MissingRecord);
        };
        if record.is_concluded() {
            return StopOutcome::Skipped(SkipReason::AlreadyConcluded);
        }

        let id = record.id.as_str();
        let mut patch = TimeTrackingPatch::stop(now);
        if let Some((lat, long)) = end_location {
            patch = patch.with_end_location(lat, long);
        }
        self.stop_time = Some(now);
        match self.context.update_time_tracking(&id, &patch).await {
            Ok(updated) => {
                self.time_tracking = Some(updated.clone());
                StopOutcome::Stopped(updated)
            }
            Err(error) => StopOutcome::Failed(error),
        }
    }
}
