//! Category repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Category;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Category>>;

    async fn list(&self) -> DomainResult<Vec<Category>>;

    async fn update(&self, category: &Category) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Delete every category. Returns the number removed.
    async fn delete_all(&self) -> DomainResult<u64>;
}
