// ABOUTME: Database state shared by the API handlers
// ABOUTME: Wraps the SQLite pool and the storage layers built on it

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use asb_storage::{DraftStorage, StorageError};

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub draft_storage: Arc<DraftStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        let draft_storage = Arc::new(DraftStorage::new(pool.clone()));
        Self {
            pool,
            draft_storage,
        }
    }

    /// Open the database file at `database_path` and run migrations
    pub async fn init_with_path(database_path: &Path) -> Result<Self, StorageError> {
        let pool = asb_storage::connect(database_path).await?;
        Ok(Self::new(pool))
    }

    /// Throwaway in-memory database, used by tests and `--ephemeral` runs
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = asb_storage::connect_in_memory().await?;
        Ok(Self::new(pool))
    }
}
