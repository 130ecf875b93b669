//! Candidate narrowing for suggestions.
//!
//! The filter loosens the price ceiling slightly above the hard budget so
//! the oracle can combine cheaper items; the hard budget itself is enforced
//! later by the selector and validator, never here.

use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Money, SelectionConfig, Service};
use crate::domain::ports::{ServiceFilter, ServiceRepository};

#[derive(Debug, Clone, Copy)]
pub struct CatalogFilter {
    limit: usize,
    buffer_percent: u32,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl CatalogFilter {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            limit: config.candidate_limit,
            buffer_percent: config.soft_buffer_percent,
        }
    }

    /// Price ceiling applied to candidates for a given hard budget.
    pub fn soft_ceiling(&self, hard_budget: Option<Money>) -> Option<Money> {
        hard_budget.map(|b| b.with_buffer_percent(self.buffer_percent))
    }

    /// Repository query for the candidate set: any of the categories, priced
    /// at most the soft ceiling, capped at the candidate limit.
    pub fn query(&self, required_categories: &[Uuid], hard_budget: Option<Money>) -> ServiceFilter {
        ServiceFilter {
            category_ids: required_categories.to_vec(),
            max_price: self.soft_ceiling(hard_budget),
            limit: Some(self.limit),
        }
    }

    /// Load the candidate set from the catalog.
    pub async fn candidates<R>(
        &self,
        repository: &R,
        required_categories: &[Uuid],
        hard_budget: Option<Money>,
    ) -> DomainResult<Vec<Service>>
    where
        R: ServiceRepository + ?Sized,
    {
        repository.list(self.query(required_categories, hard_budget)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteCategoryRepository, SqliteServiceRepository, SqliteUserRepository,
        SqliteVendorRepository,
    };
    use crate::domain::models::{Category, User, UserRole, Vendor};
    use crate::domain::ports::{CategoryRepository, UserRepository, VendorRepository};

    struct Catalog {
        repo: SqliteServiceRepository,
        vendor: Vendor,
        music: Category,
        food: Category,
    }

    async fn catalog() -> Catalog {
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

        Catalog {
            repo: SqliteServiceRepository::new(pool),
            vendor,
            music,
            food,
        }
    }

    async fn add(c: &Catalog, name: &str, units: i64, categories: &[Uuid]) {
        let s = Service::new(name, Money::from_units(units), c.vendor.id, "x.png")
            .with_categories(categories.iter().copied());
        c.repo.create(&s).await.unwrap();
    }

    fn names(services: &[Service]) -> Vec<&str> {
        services.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_soft_ceiling_is_five_percent_above() {
        let filter = CatalogFilter::default();
        assert_eq!(filter.soft_ceiling(Some(Money::from_units(200))), Some(Money::from_units(210)));
        assert_eq!(filter.soft_ceiling(None), None);
    }

    #[test]
    fn test_query_carries_ceiling_and_limit() {
        let cat = Uuid::new_v4();
        let q = CatalogFilter::default().query(&[cat], Some(Money::from_units(100)));
        assert_eq!(q.category_ids, vec![cat]);
        assert_eq!(q.max_price, Some(Money::from_units(105)));
        assert_eq!(q.limit, Some(50));
    }

    #[tokio::test]
    async fn test_candidates_keep_items_within_buffer() {
        let c = catalog().await;
        add(&c, "A", 104, &[]).await;
        add(&c, "B", 106, &[]).await;
        add(&c, "C", 50, &[]).await;

        let picked = CatalogFilter::default()
            .candidates(&c.repo, &[], Some(Money::from_units(100)))
            .await
            .unwrap();
        assert_eq!(names(&picked), vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_candidates_require_any_category() {
        let c = catalog().await;
        add(&c, "DJ", 10, &[c.music.id]).await;
        add(&c, "Cake", 10, &[c.food.id]).await;
        add(&c, "Band", 10, &[c.music.id, c.food.id]).await;
        let filter = CatalogFilter::default();

        let picked = filter.candidates(&c.repo, &[c.food.id], None).await.unwrap();
        assert_eq!(names(&picked), vec!["Cake", "Band"]);
        assert!(filter.candidates(&c.repo, &[Uuid::new_v4()], None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candidates_capped_at_limit() {
        let c = catalog().await;
        for i in 0..5 {
            add(&c, &format!("S{i}"), i, &[]).await;
        }
        let filter = CatalogFilter::new(SelectionConfig {
            candidate_limit: 2,
            soft_buffer_percent: 5,
        });

        let picked = filter.candidates(&c.repo, &[], None).await.unwrap();
        assert_eq!(names(&picked), vec!["S0", "S1"]);
    }
}
