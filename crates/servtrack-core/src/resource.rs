//! Wire representation of time tracking records.
//!
//! Records leave the server only through [`TimeTrackingResource`], which copies
//! an explicit allow-list of fields. Fields added to [`TimeTracking`] later are
//! not exposed until they are listed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{TimeTracking, TimeTrackingId, TimeTrackingStatus};

/// A time tracking record as it appears in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrackingEntity {
    pub id: TimeTrackingId,
    pub employee_id: String,
    pub client_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: TimeTrackingStatus,
    pub long_start_time: Option<f64>,
    pub long_end_time: Option<f64>,
    pub lat_start_time: Option<f64>,
    pub lat_end_time: Option<f64>,
    pub notes: Option<String>,
}

impl TimeTrackingEntity {
    pub const fn is_concluded(&self) -> bool {
        self.status.is_concluded()
    }
}

/// Projects a stored record onto its wire representation.
pub struct TimeTrackingResource<'a> {
    instance: &'a TimeTracking,
}

impl<'a> TimeTrackingResource<'a> {
    pub const fn new(instance: &'a TimeTracking) -> Self {
        Self { instance }
    }

    #[must_use]
    pub fn item(&self) -> TimeTrackingEntity {
        TimeTrackingEntity {
            id: self.instance.id,
            employee_id: self.instance.employee_id.clone(),
            client_id: self.instance.client_id.clone(),
            start_time: self.instance.start_time,
            end_time: self.instance.end_time,
            status: self.instance.status,
            long_start_time: self.instance.long_start_time,
            long_end_time: self.instance.long_end_time,
            lat_start_time: self.instance.lat_start_time,
            lat_end_time: self.instance.lat_end_time,
            notes: self.instance.notes.clone(),
        }
    }

    #[must_use]
    pub fn collection(instances: &[TimeTracking]) -> Vec<TimeTrackingEntity> {
        instances
            .iter()
            .map(|instance| TimeTrackingResource::new(instance).item())
            .collect()
    }
}

impl From<&TimeTracking> for TimeTrackingEntity {
    fn from(value: &TimeTracking) -> Self {
        TimeTrackingResource::new(value).item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTimeTracking, TimeTrackingPatch};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const WIRE_KEYS: [&str; 11] = [
        "clientId",
        "employeeId",
        "endTime",
        "id",
        "latEndTime",
        "latStartTime",
        "longEndTime",
        "longStartTime",
        "notes",
        "startTime",
        "status",
    ];

    fn sample() -> TimeTracking {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 11, 15, 0).unwrap();
        TimeTracking::from_new(
            &NewTimeTracking::new("emp-7", "client-3")
                .with_start_time(start)
                .with_start_location(-23.55, -46.63)
                .with_notes("pool maintenance"),
            start,
        )
        .unwrap()
        .apply_patch(&TimeTrackingPatch::stop(end).with_end_location(-23.56, -46.64), end)
        .unwrap()
    }

    #[test]
    fn item_exposes_exactly_the_allow_list() {
        let value = serde_json::to_value(TimeTrackingResource::new(&sample()).item()).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, WIRE_KEYS);
        assert!(value.get("createdAt").is_none());
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn item_copies_values_unchanged() {
        let record = sample();
        let entity = TimeTrackingResource::new(&record).item();
        assert_eq!(entity.id, record.id);
        assert_eq!(entity.employee_id, "emp-7");
        assert_eq!(entity.client_id, "client-3");
        assert_eq!(entity.start_time, record.start_time);
        assert_eq!(entity.end_time, record.end_time);
        assert_eq!(entity.status, TimeTrackingStatus::Concluded);
        assert_eq!(entity.lat_start_time, Some(-23.55));
        assert_eq!(entity.long_start_time, Some(-46.63));
        assert_eq!(entity.lat_end_time, Some(-23.56));
        assert_eq!(entity.long_end_time, Some(-46.64));
        assert_eq!(entity.notes.as_deref(), Some("pool maintenance"));
    }

    #[test]
    fn active_record_keeps_null_keys() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap();
        let record = TimeTracking::from_new(&NewTimeTracking::new("e1", "c1"), start).unwrap();
        let value = serde_json::to_value(TimeTrackingEntity::from(&record)).unwrap();
        assert_eq!(value["endTime"], serde_json::Value::Null);
        assert_eq!(value["notes"], serde_json::Value::Null);
        assert_eq!(value["status"], "active");
        assert_eq!(value["startTime"], "2024-03-04T08:30:00Z");
    }

    #[test]
    fn collection_preserves_order() {
        let first = sample();
        let second = sample();
        let entities = TimeTrackingResource::collection(&[first.clone(), second.clone()]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, first.id);
        assert_eq!(entities[1].id, second.id);
    }
}
