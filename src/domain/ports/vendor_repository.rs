//! Vendor repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Vendor;

#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn create(&self, vendor: &Vendor) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Vendor>>;

    /// Look up a vendor by its normalized business name.
    async fn get_by_name(&self, business_name: &str) -> DomainResult<Option<Vendor>>;

    async fn list(&self) -> DomainResult<Vec<Vendor>>;

    async fn update(&self, vendor: &Vendor) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Delete every vendor with its services. Returns the number removed.
    async fn delete_all(&self) -> DomainResult<u64>;
}
