//! HTTP client for the time tracking API.

use serde::de::DeserializeOwned;

use super::service::{ServiceError, ServiceResult, TimeTrackingService};
use crate::envelope::{DataResponse, ErrorCode, ErrorEnvelope};
use crate::models::{NewTimeTracking, TimeTrackingPatch};
use crate::resource::TimeTrackingEntity;
use crate::util::{compact_text, normalize_base_url};

const COLLECTION_ROUTE: &str = "/v1/time-tracking";

/// [`TimeTrackingService`] backed by the servtrack API.
#[derive(Debug, Clone)]
pub struct HttpTimeTrackingService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTimeTrackingService {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl Into<String>) -> ServiceResult<Self> {
        let base_url = normalize_base_url(base_url.into().as_str())
            .map_err(ServiceError::InvalidConfiguration)?;
        let client = reqwest::Client::builder().build().map_err(|error| {
            ServiceError::InvalidConfiguration(format!(
                "Failed to construct HTTP client: {error}"
            ))
        })?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION_ROUTE}", self.base_url)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), urlencoding::encode(id.trim()))
    }

    fn filtered_url(&self, scope: &str, value: &str) -> String {
        format!(
            "{}/{scope}/{}",
            self.collection_url(),
            urlencoding::encode(value.trim())
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ServiceResult<T> {
        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }
        let payload = response
            .json::<DataResponse<T>>()
            .await
            .map_err(|error| ServiceError::InvalidPayload(error.to_string()))?;
        Ok(payload.data)
    }
}

impl TimeTrackingService for HttpTimeTrackingService {
    async fn get_all(&self) -> ServiceResult<Vec<TimeTrackingEntity>> {
        self.send(self.client.get(self.collection_url())).await
    }

    async fn get_by_client(&self, client_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        self.send(self.client.get(self.filtered_url("client", client_id)))
            .await
    }

    async fn get_by_employee(&self, employee_id: &str) -> ServiceResult<Vec<TimeTrackingEntity>> {
        self.send(self.client.get(self.filtered_url("employee", employee_id)))
            .await
    }

    async fn get_by_id(&self, id: &str) -> ServiceResult<TimeTrackingEntity> {
        self.send(self.client.get(self.record_url(id))).await
    }

    async fn create(&self, data: &NewTimeTracking) -> ServiceResult<TimeTrackingEntity> {
        self.send(self.client.post(self.collection_url()).json(data))
            .await
    }

    async fn update(
        &self,
        id: &str,
        patch: &TimeTrackingPatch,
    ) -> ServiceResult<TimeTrackingEntity> {
        self.send(self.client.patch(self.record_url(id)).json(patch))
            .await
    }
}

/// Turns a failed response into a [`ServiceError::Api`].
///
/// Bodies that are not an error envelope get one synthesized from the status.
fn api_error(status: u16, body: &str) -> ServiceError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return ServiceError::Api { status, envelope };
    }

    let code = match status {
        404 => ErrorCode::NotFound,
        501 => ErrorCode::NotImplemented,
        400 | 409 | 422 => ErrorCode::Validation,
        _ => ErrorCode::Remote,
    };
    let message = if body.trim().is_empty() {
        format!("Request failed with HTTP {status}")
    } else {
        compact_text(body)
    };
    ServiceError::Api {
        status,
        envelope: ErrorEnvelope::new(code, message),
    }
}
