//! Opening the Planora SQLite store.
//!
//! File databases run in WAL mode so readers never block the single writer;
//! every connection enforces foreign keys, which the repositories rely on to
//! reject dangling references.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::DatabaseConfig;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Invalid database location {0}")]
    InvalidLocation(String),
    #[error("Cannot create database directory {path}: {source}")]
    CreateDirectory { path: String, #[source] source: std::io::Error },
    #[error("Cannot open database: {0}")]
    Open(#[source] sqlx::Error),
}

fn connect_options(url: &str) -> Result<SqliteConnectOptions, ConnectionError> {
    Ok(SqliteConnectOptions::from_str(url)
        .map_err(|_| ConnectionError::InvalidLocation(url.to_string()))?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT))
}

/// Open a pool on the configured database file, creating the file and its
/// directory when missing.
pub async fn open_pool(config: &DatabaseConfig) -> Result<SqlitePool, ConnectionError> {
    let url = config.url();
    let file = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConnectionError::CreateDirectory {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let options = connect_options(&url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)
}

/// A private in-memory database on a single connection, for tests.
pub async fn open_in_memory() -> Result<SqlitePool, ConnectionError> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options("sqlite::memory:")?)
        .await
        .map_err(ConnectionError::Open)
}
