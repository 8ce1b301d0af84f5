// ABOUTME: Data layer and persistence for ASB drafts
// ABOUTME: SQLite pool setup, embedded migrations and the shared storage error type

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use asb_core::DraftError;

pub mod drafts;

pub use drafts::DraftStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Draft not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Draft(#[from] DraftError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Connection settings shared by file-backed and in-memory databases
fn connect_options(database_url: &str) -> StorageResult<SqliteConnectOptions> {
    Ok(SqliteConnectOptions::from_str(database_url)
        .map_err(StorageError::Sqlx)?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30)))
}

/// Open (creating if needed) the SQLite database at `database_path` and
/// bring its schema up to date
pub async fn connect(database_path: &Path) -> StorageResult<SqlitePool> {
    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Io)?;
        }
    }

    let database_url = format!("sqlite:{}", database_path.display());
    debug!("Connecting to database: {}", database_url);

    let options = connect_options(&database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    // every connection to :memory: is its own database, so keep exactly one
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:")?)
        .await
        .map_err(StorageError::Sqlx)?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");
    Ok(())
}
