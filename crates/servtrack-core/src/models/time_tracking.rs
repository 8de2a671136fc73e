//! Time tracking record model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// A unique identifier for a time tracking record, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeTrackingId(Uuid);

impl TimeTrackingId {
    /// Create a new unique record ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for TimeTrackingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimeTrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimeTrackingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Lifecycle marker of a service session.
///
/// The only permitted transition is `Active -> Concluded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeTrackingStatus {
    #[default]
    Active,
    Concluded,
}

impl TimeTrackingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Concluded => "concluded",
        }
    }

    pub const fn is_concluded(self) -> bool {
        matches!(self, Self::Concluded)
    }
}

impl fmt::Display for TimeTrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeTrackingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "concluded" => Ok(Self::Concluded),
            other => Err(Error::InvalidInput(format!(
                "unknown time tracking status: {other}"
            ))),
        }
    }
}

/// Field-level validation failures, reported all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .messages.join("; "))]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `Ok(())` when nothing was pushed, otherwise `Err(self)`.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// One employee service session against one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTracking {
    /// Server-assigned identifier
    pub id: TimeTrackingId,
    /// Employee performing the service
    pub employee_id: String,
    /// Client the service is performed for
    pub client_id: String,
    /// When the session started
    pub start_time: DateTime<Utc>,
    /// When the session concluded; `None` while active
    pub end_time: Option<DateTime<Utc>>,
    /// Lifecycle marker
    pub status: TimeTrackingStatus,
    pub long_start_time: Option<f64>,
    pub long_end_time: Option<f64>,
    pub lat_start_time: Option<f64>,
    pub lat_end_time: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Storage bookkeeping (Unix ms), never exposed on the wire
    pub created_at: i64,
    /// Storage bookkeeping (Unix ms), never exposed on the wire
    pub updated_at: i64,
}

impl TimeTracking {
    /// Build a new record from create input.
    ///
    /// Status defaults to active and the start time to `now`. Timestamps are
    /// stored with millisecond precision; finer input is truncated.
    pub fn from_new(input: &NewTimeTracking, now: DateTime<Utc>) -> Result<Self> {
        let now = now.trunc_subsecs(3);
        let record = Self {
            id: TimeTrackingId::new(),
            employee_id: input.employee_id.trim().to_string(),
            client_id: input.client_id.trim().to_string(),
            start_time: input.start_time.map_or(now, |start| start.trunc_subsecs(3)),
            end_time: input.end_time.map(|end| end.trunc_subsecs(3)),
            status: input.status.unwrap_or_default(),
            long_start_time: input.long_start_time,
            long_end_time: input.long_end_time,
            lat_start_time: input.lat_start_time,
            lat_end_time: input.lat_end_time,
            notes: normalize_text_option(input.notes.clone()),
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Apply a partial update, enforcing the lifecycle rules.
    ///
    /// Start time, end time and status are frozen once the record is
    /// concluded. Concluding without an explicit end time stamps `now`.
    pub fn apply_patch(&self, patch: &TimeTrackingPatch, now: DateTime<Utc>) -> Result<Self> {
        if self.is_concluded() && patch.touches_lifecycle() {
            return Err(Error::AlreadyConcluded(self.id.to_string()));
        }

        let now = now.trunc_subsecs(3);
        let mut next = self.clone();
        if let Some(start) = patch.start_time {
            next.start_time = start.trunc_subsecs(3);
        }
        if let Some(end) = patch.end_time {
            next.end_time = Some(end.trunc_subsecs(3));
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if next.status.is_concluded() && next.end_time.is_none() {
            next.end_time = Some(now);
        }
        if patch.long_start_time.is_some() {
            next.long_start_time = patch.long_start_time;
        }
        if patch.long_end_time.is_some() {
            next.long_end_time = patch.long_end_time;
        }
        if patch.lat_start_time.is_some() {
            next.lat_start_time = patch.lat_start_time;
        }
        if patch.lat_end_time.is_some() {
            next.lat_end_time = patch.lat_end_time;
        }
        if patch.notes.is_some() {
            next.notes = normalize_text_option(patch.notes.clone());
        }
        next.updated_at = now.timestamp_millis();

        next.validate()?;
        Ok(next)
    }

    /// Check the record invariants, collecting every violation.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.employee_id.is_empty() {
            errors.push("employeeId is required");
        }
        if self.client_id.is_empty() {
            errors.push("clientId is required");
        }

        match (self.status, self.end_time) {
            (TimeTrackingStatus::Concluded, None) => {
                errors.push("endTime is required when status is concluded");
            }
            (TimeTrackingStatus::Active, Some(_)) => {
                errors.push("endTime can only be set when concluding the session");
            }
            _ => {}
        }
        if let Some(end) = self.end_time {
            if end < self.start_time {
                errors.push("endTime must not precede startTime");
            }
        }

        check_latitude(&mut errors, "latStartTime", self.lat_start_time);
        check_latitude(&mut errors, "latEndTime", self.lat_end_time);
        check_longitude(&mut errors, "longStartTime", self.long_start_time);
        check_longitude(&mut errors, "longEndTime", self.long_end_time);

        errors.into_result()
    }

    pub const fn is_concluded(&self) -> bool {
        self.status.is_concluded()
    }

    /// Elapsed session time, once concluded.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

fn check_latitude(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
    if let Some(value) = value {
        if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
            errors.push(format!("{field} must be a latitude in [-90, 90]"));
        }
    }
}

fn check_longitude(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
    if let Some(value) = value {
        if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
            errors.push(format!("{field} must be a longitude in [-180, 180]"));
        }
    }
}

/// Input for creating a time tracking record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeTracking {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TimeTrackingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewTimeTracking {
    pub fn new(employee_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub const fn with_start_location(mut self, lat: f64, long: f64) -> Self {
        self.lat_start_time = Some(lat);
        self.long_start_time = Some(long);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a time tracking record; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrackingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TimeTrackingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeTrackingPatch {
    /// The stop transition: conclude the session at `end_time`.
    #[must_use]
    pub fn stop(end_time: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(end_time),
            status: Some(TimeTrackingStatus::Concluded),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_end_location(mut self, lat: f64, long: f64) -> Self {
        self.lat_end_time = Some(lat);
        self.long_end_time = Some(long);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub const fn touches_lifecycle(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some() || self.status.is_some()
    }

    pub const fn is_empty(&self) -> bool {
        !self.touches_lifecycle()
            && self.long_start_time.is_none()
            && self.long_end_time.is_none()
            && self.lat_start_time.is_none()
            && self.lat_end_time.is_none()
            && self.notes.is_none()
    }
}
