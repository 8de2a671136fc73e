use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use http::HeaderValue;
use servtrack_core::util::is_http_url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// Allowed CORS origins; any origin when `None`.
    pub cors_origins: Option<Vec<HeaderValue>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "SERVTRACK_API_BIND_ADDR", "127.0.0.1:8080");
        if !bind_addr.contains(':') {
            return Err(ConfigError::Invalid(
                "SERVTRACK_API_BIND_ADDR must be host:port".to_string(),
            ));
        }

        let db_path = PathBuf::from(value_or_default(
            &lookup,
            "SERVTRACK_DB_PATH",
            "servtrack.db",
        ));

        let cors_origins = optional_trimmed(&lookup, "SERVTRACK_CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .transpose()?;

        Ok(Self {
            bind_addr,
            db_path,
            cors_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let origin = origin.trim_end_matches('/');
            if !is_http_url(origin) {
                return Err(ConfigError::Invalid(format!(
                    "SERVTRACK_CORS_ORIGINS entry must start with http:// or https://: {origin}"
                )));
            }
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::Invalid(format!(
                    "SERVTRACK_CORS_ORIGINS entry is not a valid header value: {origin}"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::Invalid(
            "SERVTRACK_CORS_ORIGINS must list at least one origin".to_string(),
        ));
    }
    Ok(origins)
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
