//! SQLite database adapters for the Planora backend.

pub mod category_repository;
pub mod connection;
pub mod event_repository;
pub mod gift_card_repository;
pub mod invite_repository;
pub mod invite_template_repository;
pub mod migrations;
pub mod notification_repository;
pub mod service_repository;
pub mod user_repository;
pub mod vendor_repository;

pub use category_repository::SqliteCategoryRepository;
pub use connection::{open_in_memory, open_pool, ConnectionError};
pub use event_repository::SqliteEventRepository;
pub use gift_card_repository::SqliteGiftCardRepository;
pub use invite_repository::SqliteInviteRepository;
pub use invite_template_repository::SqliteInviteTemplateRepository;
pub use migrations::{migrate, schema_version, Migration, MigrationError, MIGRATIONS};
pub use notification_repository::SqliteNotificationRepository;
pub use service_repository::SqliteServiceRepository;
pub use user_repository::SqliteUserRepository;
pub use vendor_repository::SqliteVendorRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DatabaseConfig;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a datetime so that stored values compare correctly as text.
pub fn format_sortable(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open (creating if needed) and migrate the configured database.
pub async fn initialize_from_config(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = open_pool(config).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = open_in_memory().await?;
    migrate(&pool).await?;
    Ok(pool)
}
