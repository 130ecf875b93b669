//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use planora::adapters::sqlite::{
    create_migrated_test_pool, SqliteCategoryRepository, SqliteEventRepository, SqliteServiceRepository,
    SqliteUserRepository, SqliteVendorRepository,
};
use planora::domain::models::{Category, Event, Money, Service, User, UserRole, Vendor};
use planora::domain::ports::{CategoryRepository, EventRepository, ServiceRepository, UserRepository, VendorRepository};

/// A planner, a vendor and the repositories behind them.
pub struct Marketplace {
    pub pool: SqlitePool,
    pub planner: User,
    pub vendor: Vendor,
    pub events: Arc<SqliteEventRepository>,
    pub services: Arc<SqliteServiceRepository>,
    pub categories: Arc<SqliteCategoryRepository>,
}

impl Marketplace {
    pub async fn in_memory() -> Self {
        let pool = create_migrated_test_pool().await.expect("test pool");
        Self::seed(pool).await
    }

    pub async fn seed(pool: SqlitePool) -> Self {
        let users = SqliteUserRepository::new(pool.clone());
        let planner = User::new("noor", "noor@example.com", UserRole::Couple);
        let vendor_user = User::new("tariq", "tariq@example.com", UserRole::Vendor);
        users.create(&planner).await.expect("planner");
        users.create(&vendor_user).await.expect("vendor user");

        let vendor = Vendor::new(vendor_user.id, "Gulf Events", "Full-service vendor", "gulf.png");
        SqliteVendorRepository::new(pool.clone())
            .create(&vendor)
            .await
            .expect("vendor");

        Self {
            events: Arc::new(SqliteEventRepository::new(pool.clone())),
            services: Arc::new(SqliteServiceRepository::new(pool.clone())),
            categories: Arc::new(SqliteCategoryRepository::new(pool.clone())),
            pool,
            planner,
            vendor,
        }
    }

    pub async fn category(&self, name: &str) -> Category {
        let category = Category::new(name);
        self.categories.create(&category).await.expect("category");
        category
    }

    pub async fn service(&self, name: &str, price_units: i64, categories: &[&Category]) -> Service {
        let service = Service::new(name, Money::from_units(price_units), self.vendor.id, format!("{name}.png"))
            .with_categories(categories.iter().map(|c| c.id));
        self.services.create(&service).await.expect("service");
        service
    }

    pub async fn event(&self, budget_units: i64) -> Event {
        let event = Event::new(
            self.planner.id,
            Money::from_units(budget_units),
            Utc::now() + Duration::days(30),
            "Kuwait City",
        );
        self.events.create(&event).await.expect("event");
        event
    }
}
