//! Resolving client ids against the external user directory.

use crate::context::{ServiceError, ServiceResult};
use crate::envelope::{DataResponse, ErrorCode, ErrorEnvelope};
use crate::models::ClientEntity;
use crate::util::{compact_text, normalize_base_url};

/// Source of client details for a time tracking record.
#[allow(async_fn_in_trait)]
pub trait ClientLookup {
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<ClientEntity>;

    /// Lookups that are not configured are skipped without a request.
    fn is_configured(&self) -> bool {
        true
    }
}

impl<L: ClientLookup> ClientLookup for Option<L> {
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<ClientEntity> {
        match self {
            Some(lookup) => lookup.get_user_by_id(id).await,
            None => Err(ServiceError::InvalidConfiguration(
                "User directory is not configured".to_string(),
            )),
        }
    }

    fn is_configured(&self) -> bool {
        self.as_ref().is_some_and(|lookup| lookup.is_configured())
    }
}

/// Fetches `{base_url}/{id}` from a user directory.
///
/// Accepts both a bare `ClientEntity` body and one wrapped in `{ "data": ... }`.
#[derive(Debug, Clone)]
pub struct HttpClientLookup {
    base_url: String,
    client: reqwest::Client,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum UserBody {
    Wrapped(DataResponse<ClientEntity>),
    Bare(ClientEntity),
}

impl HttpClientLookup {
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id.trim()))
    }
}

impl ClientLookup for HttpClientLookup {
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<ClientEntity> {
        let response = self
            .client
            .get(self.user_url(id))
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = if status.as_u16() == 404 {
                ErrorCode::NotFound
            } else {
                ErrorCode::Remote
            };
            return Err(ServiceError::Api {
                status: status.as_u16(),
                envelope: ErrorEnvelope::new(
                    code,
                    format!("User lookup failed: {}", compact_text(&body)),
                ),
            });
        }

        let body = response
            .json::<UserBody>()
            .await
            .map_err(|error| ServiceError::InvalidPayload(error.to_string()))?;
        Ok(match body {
            UserBody::Wrapped(wrapped) => wrapped.data,
            UserBody::Bare(user) => user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_url_encodes_id() {
        let lookup = HttpClientLookup::new("https://users.example.com/v1/users/").unwrap();
        assert_eq!(
            lookup.user_url(" c 1 "),
            "https://users.example.com/v1/users/c%201"
        );
    }

    #[test]
    fn missing_lookup_is_not_configured() {
        let lookup: Option<HttpClientLookup> = None;
        assert!(!lookup.is_configured());

        let lookup = Some(HttpClientLookup::new("http://localhost:9000").unwrap());
        assert!(lookup.is_configured());
    }

    #[test]
    fn user_body_accepts_both_shapes() {
        let wrapped: UserBody = serde_json::from_str(
            r#"{"data":{"id":"c1","name":"Ana","email":"ana@example.com"}}"#,
        )
        .unwrap();
        assert!(matches!(wrapped, UserBody::Wrapped(ref body) if body.data.id == "c1"));

        let bare: UserBody =
            serde_json::from_str(r#"{"id":"c1","name":"Ana","email":"ana@example.com"}"#).unwrap();
        assert!(matches!(bare, UserBody::Bare(ref user) if user.name == "Ana"));
    }
}
