//! SQLite implementation of the VendorRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Vendor;
use crate::domain::ports::VendorRepository;

const VENDOR_COLUMNS: &str = "id, user_id, business_name, bio, logo, created_at";

#[derive(Clone)]
pub struct SqliteVendorRepository {
    pool: SqlitePool,
}

impl SqliteVendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VendorRepository for SqliteVendorRepository {
    async fn create(&self, vendor: &Vendor) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO vendors (id, user_id, business_name, bio, logo, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(vendor.id.to_string())
        .bind(vendor.user_id.to_string())
        .bind(&vendor.business_name)
        .bind(&vendor.bio)
        .bind(&vendor.logo)
        .bind(vendor.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Vendor>> {
        let row: Option<VendorRow> =
            sqlx::query_as(&format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_name(&self, business_name: &str) -> DomainResult<Option<Vendor>> {
        let row: Option<VendorRow> =
            sqlx::query_as(&format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE business_name = ?"))
                .bind(business_name.trim().to_lowercase())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Vendor>> {
        let rows: Vec<VendorRow> =
            sqlx::query_as(&format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY business_name"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, vendor: &Vendor) -> DomainResult<()> {
        let result = sqlx::query("UPDATE vendors SET business_name = ?, bio = ?, logo = ? WHERE id = ?")
            .bind(&vendor.business_name)
            .bind(&vendor.bio)
            .bind(&vendor.logo)
            .bind(vendor.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::VendorNotFound(vendor.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::VendorNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM vendors").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct VendorRow {
    id: String,
    user_id: String,
    business_name: String,
    bio: String,
    logo: String,
    created_at: String,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = DomainError;

    fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
        Ok(Vendor {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            business_name: row.business_name,
            bio: row.bio,
            logo: row.logo,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteUserRepository};
    use crate::domain::models::{User, UserRole};
    use crate::domain::ports::UserRepository;

    #[tokio::test]
    async fn test_vendor_lookup_by_normalized_name() {
        let pool = create_migrated_test_pool().await.unwrap();
        let owner = User::new("vera", "vera@example.com", UserRole::Vendor);
        SqliteUserRepository::new(pool.clone()).create(&owner).await.unwrap();

        let repo = SqliteVendorRepository::new(pool);
        let vendor = Vendor::new(owner.id, "Bloom Florists", "Flowers", "bloom.png");
        repo.create(&vendor).await.unwrap();

        let found = repo.get_by_name("  BLOOM florists").await.unwrap().unwrap();
        assert_eq!(found.id, vendor.id);

        let duplicate = Vendor::new(owner.id, "bloom florists", "Other", "x.png");
        assert!(matches!(repo.create(&duplicate).await, Err(DomainError::DatabaseError(_))));

        let mut renamed = found;
        renamed.business_name = "petal co".to_string();
        repo.update(&renamed).await.unwrap();
        assert!(repo.get_by_name("bloom florists").await.unwrap().is_none());
        assert_eq!(repo.get_by_name("Petal Co").await.unwrap().unwrap().id, vendor.id);

        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
