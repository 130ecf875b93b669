//! Service catalog repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Money, Service};

/// Filter criteria for querying the catalog.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Match services tagged with at least one of these; empty matches all.
    pub category_ids: Vec<Uuid>,
    /// Inclusive price ceiling.
    pub max_price: Option<Money>,
    /// Maximum number of rows returned.
    pub limit: Option<usize>,
}

/// Repository interface for Service persistence.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Create a new service with its category links.
    async fn create(&self, service: &Service) -> DomainResult<()>;

    /// Get a service by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Service>>;

    /// Update an existing service and replace its category links.
    async fn update(&self, service: &Service) -> DomainResult<()>;

    /// Delete a service by ID.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Delete the whole catalog. Returns the number of services removed.
    async fn delete_all(&self) -> DomainResult<u64>;

    /// Query the catalog in stable catalog order (creation order).
    async fn list(&self, filter: ServiceFilter) -> DomainResult<Vec<Service>>;
}
