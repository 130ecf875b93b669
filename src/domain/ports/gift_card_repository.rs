//! Gift card repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::GiftCard;

#[async_trait]
pub trait GiftCardRepository: Send + Sync {
    async fn create(&self, card: &GiftCard) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<GiftCard>>;

    async fn list(&self) -> DomainResult<Vec<GiftCard>>;

    /// Cards addressed to a couple, newest first.
    async fn list_by_couple(&self, couple_id: Uuid) -> DomainResult<Vec<GiftCard>>;

    async fn update(&self, card: &GiftCard) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
