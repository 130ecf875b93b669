//! SQLite implementation of the ServiceRepository.
//!
//! Category links live in `service_categories`; catalog order is insertion
//! order (`rowid`).

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Money, Service};
use crate::domain::ports::{ServiceFilter, ServiceRepository};

pub(crate) const SERVICE_COLUMNS: &str =
    "s.id, s.name, s.description, s.service_type, s.duration, s.price_cents, s.image, s.vendor_id, s.created_at, s.updated_at";

#[derive(Clone)]
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn replace_categories(conn: &mut SqliteConnection, service: &Service) -> DomainResult<()> {
        sqlx::query("DELETE FROM service_categories WHERE service_id = ?")
            .bind(service.id.to_string())
            .execute(&mut *conn)
            .await?;

        for category_id in &service.category_ids {
            sqlx::query("INSERT INTO service_categories (service_id, category_id) VALUES (?, ?)")
                .bind(service.id.to_string())
                .bind(category_id.to_string())
                .execute(&mut *conn)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                        DomainError::CategoryNotFound(*category_id)
                    }
                    other => other.into(),
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepository {
    async fn create(&self, service: &Service) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO services (id, name, description, service_type, duration, price_cents, image, vendor_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(service.id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.service_type)
        .bind(&service.duration)
        .bind(service.price.cents())
        .bind(&service.image)
        .bind(service.vendor_id.to_string())
        .bind(service.created_at.to_rfc3339())
        .bind(service.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::VendorNotFound(service.vendor_id)
            }
            other => other.into(),
        })?;

        Self::replace_categories(&mut tx, service).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Service>> {
        let row: Option<ServiceRow> =
            sqlx::query_as(&format!("SELECT {SERVICE_COLUMNS} FROM services s WHERE s.id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(hydrate(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update(&self, service: &Service) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE services SET name = ?, description = ?, service_type = ?, duration = ?,
               price_cents = ?, image = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.service_type)
        .bind(&service.duration)
        .bind(service.price.cents())
        .bind(&service.image)
        .bind(service.updated_at.to_rfc3339())
        .bind(service.id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ServiceNotFound(service.id));
        }

        Self::replace_categories(&mut tx, service).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ServiceNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM services").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list(&self, filter: ServiceFilter) -> DomainResult<Vec<Service>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SERVICE_COLUMNS} FROM services s WHERE 1=1"));

        if !filter.category_ids.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM service_categories sc WHERE sc.service_id = s.id AND sc.category_id IN (",
            );
            let mut separated = qb.separated(", ");
            for category_id in &filter.category_ids {
                separated.push_bind(category_id.to_string());
            }
            separated.push_unseparated("))");
        }

        if let Some(max_price) = filter.max_price {
            qb.push(" AND s.price_cents <= ").push_bind(max_price.cents());
        }

        qb.push(" ORDER BY s.rowid");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<ServiceRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        hydrate(&self.pool, rows).await
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ServiceRow {
    id: String,
    name: String,
    description: Option<String>,
    service_type: String,
    duration: String,
    price_cents: i64,
    image: String,
    vendor_id: String,
    created_at: String,
    updated_at: String,
}

impl ServiceRow {
    fn into_service(self, category_ids: Vec<Uuid>) -> DomainResult<Service> {
        Ok(Service {
            id: parse_uuid(&self.id)?,
            name: self.name,
            description: self.description,
            service_type: self.service_type,
            duration: self.duration,
            price: Money::from_cents(self.price_cents),
            image: self.image,
            vendor_id: parse_uuid(&self.vendor_id)?,
            category_ids,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Attach category links to service rows, preserving row order.
pub(crate) async fn hydrate(pool: &SqlitePool, rows: Vec<ServiceRow>) -> DomainResult<Vec<Service>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT service_id, category_id FROM service_categories WHERE service_id IN (");
    let mut separated = qb.separated(", ");
    for row in &rows {
        separated.push_bind(row.id.clone());
    }
    separated.push_unseparated(") ORDER BY rowid");

    let links: Vec<(String, String)> = qb.build_query_as().fetch_all(pool).await?;

    let mut by_service: HashMap<String, Vec<Uuid>> = HashMap::new();
    for (service_id, category_id) in links {
        by_service.entry(service_id).or_default().push(parse_uuid(&category_id)?);
    }

    rows.into_iter()
        .map(|row| {
            let categories = by_service.remove(&row.id).unwrap_or_default();
            row.into_service(categories)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteCategoryRepository, SqliteUserRepository, SqliteVendorRepository,
    };
    use crate::domain::models::{Category, User, UserRole, Vendor};
    use crate::domain::ports::{CategoryRepository, UserRepository, VendorRepository};

    struct Fixture {
        repo: SqliteServiceRepository,
        vendor: Vendor,
        music: Category,
        food: Category,
    }

    async fn setup() -> Fixture {
        let pool = create_migrated_test_pool().await.unwrap();
        let owner = User::new("vera", "vera@example.com", UserRole::Vendor);
        SqliteUserRepository::new(pool.clone()).create(&owner).await.unwrap();
        let vendor = Vendor::new(owner.id, "Party Co", "Everything", "logo.png");
        SqliteVendorRepository::new(pool.clone()).create(&vendor).await.unwrap();

        let categories = SqliteCategoryRepository::new(pool.clone());
        let music = Category::new("Music");
        let food = Category::new("Food");
        categories.create(&music).await.unwrap();
        categories.create(&food).await.unwrap();

        Fixture {
            repo: SqliteServiceRepository::new(pool),
            vendor,
            music,
            food,
        }
    }

    fn service(f: &Fixture, name: &str, units: i64, categories: &[Uuid]) -> Service {
        Service::new(name, Money::from_units(units), f.vendor.id, format!("{name}.png"))
            .with_categories(categories.iter().copied())
    }

    #[tokio::test]
    async fn test_create_and_get_with_categories() {
        let f = setup().await;
        let dj = service(&f, "DJ", 300, &[f.music.id]);
        f.repo.create(&dj).await.unwrap();

        let loaded = f.repo.get(dj.id).await.unwrap().unwrap();
        assert_eq!(loaded.price, Money::from_units(300));
        assert_eq!(loaded.category_ids, vec![f.music.id]);
    }

    #[tokio::test]
    async fn test_unknown_vendor_or_category_rejected() {
        let f = setup().await;
        let orphan = Service::new("Ghost", Money::from_units(1), Uuid::new_v4(), "g.png");
        assert!(matches!(f.repo.create(&orphan).await, Err(DomainError::VendorNotFound(_))));

        let missing_category = Uuid::new_v4();
        let bad = service(&f, "Bad", 1, &[missing_category]);
        assert!(matches!(
            f.repo.create(&bad).await,
            Err(DomainError::CategoryNotFound(id)) if id == missing_category
        ));
        assert!(f.repo.get(bad.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_category_price_and_limit() {
        let f = setup().await;
        f.repo.create(&service(&f, "Band", 900, &[f.music.id])).await.unwrap();
        f.repo.create(&service(&f, "Buffet", 400, &[f.food.id])).await.unwrap();
        f.repo.create(&service(&f, "DJ", 300, &[f.music.id])).await.unwrap();
        f.repo.create(&service(&f, "Cake", 80, &[f.food.id, f.music.id])).await.unwrap();

        let music = f
            .repo
            .list(ServiceFilter {
                category_ids: vec![f.music.id],
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = music.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Band", "DJ", "Cake"]);

        let cheap = f
            .repo
            .list(ServiceFilter {
                max_price: Some(Money::from_units(300)),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = cheap.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["DJ", "Cake"]);

        let limited = f
            .repo
            .list(ServiceFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].name, "Band");
    }

    #[tokio::test]
    async fn test_update_replaces_categories() {
        let f = setup().await;
        let mut dj = service(&f, "DJ", 300, &[f.music.id]);
        f.repo.create(&dj).await.unwrap();

        dj.price = Money::from_units(350);
        dj.category_ids = vec![f.food.id];
        f.repo.update(&dj).await.unwrap();

        let loaded = f.repo.get(dj.id).await.unwrap().unwrap();
        assert_eq!(loaded.price, Money::from_units(350));
        assert_eq!(loaded.category_ids, vec![f.food.id]);
    }

    #[tokio::test]
    async fn test_delete_missing_service() {
        let f = setup().await;
        assert!(matches!(
            f.repo.delete(Uuid::new_v4()).await,
            Err(DomainError::ServiceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_all_clears_catalog() {
        let f = setup().await;
        f.repo.create(&service(&f, "DJ", 300, &[f.music.id])).await.unwrap();
        f.repo.create(&service(&f, "Cake", 80, &[f.food.id])).await.unwrap();

        assert_eq!(f.repo.delete_all().await.unwrap(), 2);
        assert!(f.repo.list(ServiceFilter::default()).await.unwrap().is_empty());
    }
}
