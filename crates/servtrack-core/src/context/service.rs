//! The remote time tracking API as seen by client code.

use thiserror::Error;

use crate::envelope::{ErrorCode, ErrorEnvelope};
use crate::models::{NewTimeTracking, TimeTrackingId, TimeTrackingPatch};
use crate::resource::{TimeTrackingEntity, TimeTrackingResource};
use crate::services::DatabaseService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid service configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{} ({status})", .envelope.error.message)]
    Api { status: u16, envelope: ErrorEnvelope },
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Storage(#[from] crate::Error),
}

impl ServiceError {
    /// Error code as the remote API would report it.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api { envelope, .. } => envelope.code(),
            Self::Storage(error) => ErrorCode::from(error),
            Self::InvalidConfiguration(_) | Self::Http(_) | Self::InvalidPayload(_) => {
                ErrorCode::Remote
            }
        }
    }

    /// Sub-error messages carried by the envelope, if any.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Api { envelope, .. } => envelope
                .error
                .errors
                .iter()
                .map(|sub| sub.message.clone())
                .collect(),
            Self::Storage(crate::Error::Validation(errors)) => errors.messages().to_vec(),
            _ => Vec::new(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Transport for time tracking records.
///
/// Implemented over HTTP for remote use and directly over
/// [`DatabaseService`] for embedded use.
#[allow(async_fn_in_trait)]
pub trait TimeTrackingService {
    /// All records
    async fn get_all(&self) -> ServiceResult<Vec<TimeTrackingEntity>>;

    /// Records for one client, filtered by the service
    async fn get_by_client(&self, client_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>>;

    /// Records for one employee, filtered by the service
    async fn get_by_employee(&self, employee_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>>;

    /// A single record
    async fn get_by_id(&self, id: &str) -> ServiceResult<TimeTrackingEntity>;

    /// Create a record; the service assigns id and defaults
    async fn create(&self, data: &NewTimeTracking) -> ServiceResult<TimeTrackingEntity>;

    /// Apply a partial update
    async fn update(&self, id: &str, patch: &TimeTrackingPatch)
        -> ServiceResult<TimeTrackingEntity>;
}

fn parse_id(raw: &str) -> ServiceResult<TimeTrackingId> {
    raw.parse().map_err(|_| {
        ServiceError::Storage(crate::Error::InvalidInput(format!(
            "Invalid time tracking id: {}",
            raw.trim()
        )))
    })
}

impl TimeTrackingService for DatabaseService {
    async fn get_all(&self) -> ServiceResult<Vec<TimeTrackingEntity>> {
        let records = self.list_time_tracking().await?;
        Ok(TimeTrackingResource::collection(&records))
    }

    async fn get_by_client(&self, client_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        let records = self.list_time_tracking_by_client(client_id).await?;
        Ok(TimeTrackingResource::collection(&records))
    }

    async fn get_by_employee(&self, employee_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        let records = self.list_time_tracking_by_employee(employee_id).await?;
        Ok(TimeTrackingResource::collection(&records))
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<TimeTrackingEntity> {
        let id = parse_id(id)?;
        let record = self
            .get_time_tracking(&id)
            .await?
            .ok_or_else(|| crate::Error::NotFound(id.to_string()))?;
        Ok(TimeTrackingResource::new(&record).item())
    }

    async fn create(&self, data: &NewTimeTracking) -> ServiceResult<TimeTrackingEntity> {
        let record = self.create_time_tracking(data).await?;
        Ok(TimeTrackingResource::new(&record).item())
    }

    async fn update(
        &self,
        id: &str,
        patch: &TimeTrackingPatch,
    ) -> ServiceResult<TimeTrackingEntity> {
        let id = parse_id(id)?;
        let record = self.update_time_tracking(&id, patch).await?;
        Ok(TimeTrackingResource::new(&record).item())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeTrackingStatus;
    use chrono::Utc;

    #[tokio::test(flavor = "multi_thread")]
    async fn database_service_speaks_wire_entities() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        let created = service
            .create(&NewTimeTracking::new("e1", "c1"))
            .await
            .unwrap();
        assert_eq!(created.status, TimeTrackingStatus::Active);

        let by_client = service.get_by_client("c1").await.unwrap();
        assert_eq!(by_client, vec![created.clone()]);
        assert!(service.get_by_employee("e2").await.unwrap().is_empty());

        let fetched = service.get_by_id(&created.id.as_str()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn database_service_maps_errors_to_codes() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        let err = service.get_by_id("not-a-uuid").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);

        let err = service
            .get_by_id(&TimeTrackingId::new().as_str())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service
            .create(&NewTimeTracking::new("", ""))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
        assert_eq!(err.details().len(), 2);

        let created = service
            .create(&NewTimeTracking::new("e1", "c1"))
            .await
            .unwrap();
        let end = Utc::now() + chrono::Duration::minutes(5);
        service
            .update(&created.id.as_str(), &TimeTrackingPatch::stop(end))
            .await
            .unwrap();
        let err = service
            .update(&created.id.as_str(), &TimeTrackingPatch::stop(end))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn api_error_displays_message_and_status() {
        let err = ServiceError::Api {
            status: 404,
            envelope: ErrorEnvelope::new(ErrorCode::NotFound, "Time tracking record not found"),
        };
        assert_eq!(err.to_string(), "Time tracking record not found (404)");
    }
}
