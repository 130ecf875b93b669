//! SQLite implementation of the UserRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{User, UserRole};
use crate::domain::ports::UserRepository;

const USER_COLUMNS: &str = "id, username, email, role, image, created_at";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, role, image, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.image)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? ORDER BY rowid LIMIT 1"))
                .bind(email.trim().to_lowercase())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, rowid"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let result = sqlx::query("UPDATE users SET username = ?, email = ?, role = ?, image = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.image)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn delete_non_admins(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE role <> ?")
            .bind(UserRole::Admin.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    role: String,
    image: Option<String>,
    created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::from_str(&row.role)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid role: {}", row.role)))?;

        Ok(User {
            id: parse_uuid(&row.id)?,
            username: row.username,
            email: row.email,
            role,
            image: row.image,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = SqliteUserRepository::new(create_migrated_test_pool().await.unwrap());
        let user = User::new("sara", "sara@example.com", UserRole::Couple).with_image("me.png");
        repo.create(&user).await.unwrap();

        let loaded = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.username, "sara");
        assert_eq!(loaded.role, UserRole::Couple);
        assert_eq!(loaded.image.as_deref(), Some("me.png"));
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_lookup_and_delete() {
        let repo = SqliteUserRepository::new(create_migrated_test_pool().await.unwrap());
        let mut user = User::new("sara", "sara@example.com", UserRole::Normal);
        repo.create(&user).await.unwrap();

        user.role = UserRole::Couple;
        user.email = "sara@home.org".to_string();
        repo.update(&user).await.unwrap();

        let found = repo.get_by_email(" SARA@home.org").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, UserRole::Couple);
        assert!(repo.get_by_email("sara@example.com").await.unwrap().is_none());

        repo.delete(user.id).await.unwrap();
        assert!(matches!(repo.delete(user.id).await, Err(DomainError::UserNotFound(_))));
        assert!(matches!(repo.update(&user).await, Err(DomainError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_non_admins_keeps_admins() {
        let repo = SqliteUserRepository::new(create_migrated_test_pool().await.unwrap());
        let admin = User::new("root", "root@example.com", UserRole::Admin);
        repo.create(&admin).await.unwrap();
        repo.create(&User::new("a", "a@example.com", UserRole::Couple)).await.unwrap();
        repo.create(&User::new("b", "b@example.com", UserRole::Vendor)).await.unwrap();

        assert_eq!(repo.delete_non_admins().await.unwrap(), 2);
        let left: Vec<_> = repo.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(left, vec![admin.id]);
    }
}
