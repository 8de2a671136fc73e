//! Time tracking repository implementation

use chrono::{DateTime, Utc};
use libsql::params::IntoParams;
use libsql::{params, Connection};

use crate::error::{Error, Result};
use crate::models::{NewTimeTracking, TimeTracking, TimeTrackingId, TimeTrackingPatch};

const SELECT_COLUMNS: &str = "SELECT id, employee_id, client_id, start_time, end_time, status,
        long_start_time, long_end_time, lat_start_time, lat_end_time, notes,
        created_at, updated_at
     FROM time_tracking";

/// Trait for time tracking storage operations (async)
#[allow(async_fn_in_trait)]
pub trait TimeTrackingRepository {
    /// Create a new record, defaulting status and start time
    async fn create(&self, input: &NewTimeTracking) -> Result<TimeTracking>;

    /// Get a record by ID
    async fn get(&self, id: &TimeTrackingId) -> Result<Option<TimeTracking>>;

    /// List all records, most recently started first
    async fn list(&self) -> Result<Vec<TimeTracking>>;

    /// List records for one client
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<TimeTracking>>;

    /// List records for one employee
    async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<TimeTracking>>;

    /// Apply a partial update, enforcing the lifecycle rules
    async fn update(&self, id: &TimeTrackingId, patch: &TimeTrackingPatch)
        -> Result<TimeTracking>;
}

/// libSQL implementation of `TimeTrackingRepository`
pub struct LibSqlTimeTrackingRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlTimeTrackingRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn query_records(&self, sql: &str, params: impl IntoParams) -> Result<Vec<TimeTracking>> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::parse_record(&row)?);
        }
        Ok(records)
    }

    /// Parse a record from a database row
    fn parse_record(row: &libsql::Row) -> Result<TimeTracking> {
        let id: String = row.get(0)?;
        let start_time: i64 = row.get(3)?;
        let end_time: Option<i64> = row.get(4)?;
        let status: String = row.get(5)?;

        Ok(TimeTracking {
            id: id
                .parse()
                .map_err(|_| Error::Database(format!("Invalid time tracking id in row: {id}")))?,
            employee_id: row.get(1)?,
            client_id: row.get(2)?,
            start_time: from_millis(start_time)?,
            end_time: end_time.map(from_millis).transpose()?,
            status: status.parse()?,
            long_start_time: row.get(6)?,
            long_end_time: row.get(7)?,
            lat_start_time: row.get(8)?,
            lat_end_time: row.get(9)?,
            notes: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

impl TimeTrackingRepository for LibSqlTimeTrackingRepository<'_> {
    async fn create(&self, input: &NewTimeTracking) -> Result<TimeTracking> {
        let record = TimeTracking::from_new(input, Utc::now())?;

        self.conn
            .execute(
                "INSERT INTO time_tracking (
                    id, employee_id, client_id, start_time, end_time, status,
                    long_start_time, long_end_time, lat_start_time, lat_end_time, notes,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    record.id.as_str(),
                    record.employee_id.clone(),
                    record.client_id.clone(),
                    record.start_time.timestamp_millis(),
                    record.end_time.map(|end| end.timestamp_millis()),
                    record.status.as_str(),
                    record.long_start_time,
                    record.long_end_time,
                    record.lat_start_time,
                    record.lat_end_time,
                    record.notes.clone(),
                    record.created_at,
                    record.updated_at,
                ],
            )
            .await?;

        Ok(record)
    }

    async fn get(&self, id: &TimeTrackingId) -> Result<Option<TimeTracking>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let mut records = self.query_records(&sql, [id.as_str()]).await?;
        Ok(records.pop())
    }

    async fn list(&self) -> Result<Vec<TimeTracking>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY start_time DESC, id DESC");
        self.query_records(&sql, ()).await
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<TimeTracking>> {
        let sql = format!("{SELECT_COLUMNS} WHERE client_id = ? ORDER BY start_time DESC, id DESC");
        self.query_records(&sql, [client_id.trim()]).await
    }

    async fn list_by_employee(&self, employee_id: &str) -> Result<Vec<TimeTracking>> {
        let sql =
            format!("{SELECT_COLUMNS} WHERE employee_id = ? ORDER BY start_time DESC, id DESC");
        self.query_records(&sql, [employee_id.trim()]).await
    }

    async fn update(
        &self,
        id: &TimeTrackingId,
        patch: &TimeTrackingPatch,
    ) -> Result<TimeTracking> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let next = current.apply_patch(patch, Utc::now())?;

        let rows = self
            .conn
            .execute(
                "UPDATE time_tracking SET
                    start_time = ?, end_time = ?, status = ?,
                    long_start_time = ?, long_end_time = ?, lat_start_time = ?, lat_end_time = ?,
                    notes = ?, updated_at = ?
                 WHERE id = ? AND status = ?",
                params![
                    next.start_time.timestamp_millis(),
                    next.end_time.map(|end| end.timestamp_millis()),
                    next.status.as_str(),
                    next.long_start_time,
                    next.long_end_time,
                    next.lat_start_time,
                    next.lat_end_time,
                    next.notes.clone(),
                    next.updated_at,
                    id.as_str(),
                    current.status.as_str(),
                ],
            )
            .await?;

        // Status moved underneath us; only a concurrent stop can do that
        if rows == 0 {
            return Err(Error::AlreadyConcluded(id.to_string()));
        }

        Ok(next)
    }
}

fn from_millis(value: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| Error::Database(format!("Timestamp out of range: {value}")))
}
