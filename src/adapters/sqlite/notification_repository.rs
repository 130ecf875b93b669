//! SQLite implementation of the NotificationRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_sortable, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Notification, NotificationKind};
use crate::domain::ports::NotificationRepository;

const NOTIFICATION_COLUMNS: &str = "id, user_id, vendor_id, title, message, kind, read, created_at";

#[derive(Clone)]
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, id: Uuid) -> DomainResult<Vec<Notification>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE {column} = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: &Notification) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO notifications (id, user_id, vendor_id, title, message, kind, read, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(notification.id.to_string())
        .bind(notification.user_id.to_string())
        .bind(notification.vendor_id.to_string())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.read)
        .bind(format_sortable(&notification.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Notification>> {
        let row: Option<NotificationRow> =
            sqlx::query_as(&format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>> {
        self.list_where("user_id", user_id).await
    }

    async fn list_for_vendor(&self, vendor_id: Uuid) -> DomainResult<Vec<Notification>> {
        self.list_where("vendor_id", vendor_id).await
    }

    async fn mark_read(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotificationNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotificationNotFound(id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: String,
    user_id: String,
    vendor_id: String,
    title: String,
    message: String,
    kind: String,
    read: bool,
    created_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::from_str(&row.kind)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid notification kind: {}", row.kind)))?;

        Ok(Notification {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            vendor_id: parse_uuid(&row.vendor_id)?,
            title: row.title,
            message: row.message,
            kind,
            read: row.read,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteUserRepository, SqliteVendorRepository};
    use crate::domain::models::{User, UserRole, Vendor};
    use crate::domain::ports::{UserRepository, VendorRepository};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_notifications_newest_first_and_mark_read() {
        let pool = create_migrated_test_pool().await.unwrap();
        let users = SqliteUserRepository::new(pool.clone());
        let couple = User::new("lina", "lina@example.com", UserRole::Couple);
        let owner = User::new("vera", "vera@example.com", UserRole::Vendor);
        users.create(&couple).await.unwrap();
        users.create(&owner).await.unwrap();
        let vendor = Vendor::new(owner.id, "Bloom", "Flowers", "bloom.png");
        SqliteVendorRepository::new(pool.clone()).create(&vendor).await.unwrap();

        let repo = SqliteNotificationRepository::new(pool);
        let mut older = Notification::new(couple.id, vendor.id, "Quote", "Your quote is ready");
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = Notification::new(couple.id, vendor.id, "Booked", "See you there");
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let titles: Vec<_> = repo.list_for_user(couple.id).await.unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Booked", "Quote"]);
        assert_eq!(repo.list_for_vendor(vendor.id).await.unwrap().len(), 2);
        assert!(repo.list_for_user(owner.id).await.unwrap().is_empty());

        repo.mark_read(older.id).await.unwrap();
        assert!(repo.get(older.id).await.unwrap().unwrap().read);
        assert!(!repo.get(newer.id).await.unwrap().unwrap().read);

        repo.delete(older.id).await.unwrap();
        assert!(matches!(repo.mark_read(older.id).await, Err(DomainError::NotificationNotFound(_))));
    }
}
