//! Shared database service wrapper used by the API and embedded clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{Database, LibSqlTimeTrackingRepository, TimeTrackingRepository, IN_MEMORY_PATH};
use crate::models::{NewTimeTracking, TimeTracking, TimeTrackingId, TimeTrackingPatch};
use crate::Result;

/// Thread-safe service for DB and repository operations.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    ///
    /// `:memory:` opens an ephemeral database instead.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if db_path.as_os_str() == IN_MEMORY_PATH {
            return Self::open_in_memory().await;
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::open(&db_path).await?;
        tracing::info!("Time tracking database ready at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Filesystem path of the database, `None` when in memory.
    pub fn db_path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// List all records, most recently started first.
    pub async fn list_time_tracking(&self) -> Result<Vec<TimeTracking>> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.list().await
    }

    /// List records for a client.
    pub async fn list_time_tracking_by_client(&self, client_id: &str) -> Result<Vec<TimeTracking>> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.list_by_client(client_id).await
    }

    /// List records for an employee.
    pub async fn list_time_tracking_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<TimeTracking>> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.list_by_employee(employee_id).await
    }

    /// Fetch a record by id.
    pub async fn get_time_tracking(&self, id: &TimeTrackingId) -> Result<Option<TimeTracking>> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.get(id).await
    }

    /// Create a record.
    pub async fn create_time_tracking(&self, input: &NewTimeTracking) -> Result<TimeTracking> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.create(input).await
    }

    /// Apply a partial update to a record.
    pub async fn update_time_tracking(
        &self,
        id: &TimeTrackingId,
        patch: &TimeTrackingPatch,
    ) -> Result<TimeTracking> {
        let db = self.db.lock().await;
        let repo = LibSqlTimeTrackingRepository::new(db.connection());
        repo.update(id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_create_and_list_roundtrip() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        service
            .create_time_tracking(&NewTimeTracking::new("e1", "c1"))
            .await
            .unwrap();
        let records = service.list_time_tracking().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "e1");
        assert!(service.db_path().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn open_path_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("servtrack.db");

        let service = DatabaseService::open_path(&db_path).await.unwrap();
        assert!(db_path.parent().unwrap().exists());
        assert_eq!(service.db_path(), Some(&db_path));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clones_share_the_same_database() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        let clone = service.clone();

        let created = clone
            .create_time_tracking(&NewTimeTracking::new("e1", "c1"))
            .await
            .unwrap();
        let fetched = service.get_time_tracking(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }
}
