//! Invite template repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::InviteTemplate;

#[async_trait]
pub trait InviteTemplateRepository: Send + Sync {
    async fn create(&self, template: &InviteTemplate) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<InviteTemplate>>;

    /// The oldest template, used when an invite names none.
    async fn first(&self) -> DomainResult<Option<InviteTemplate>>;

    async fn list(&self) -> DomainResult<Vec<InviteTemplate>>;

    async fn update(&self, template: &InviteTemplate) -> DomainResult<()>;

    /// Delete a template. Invites using it keep no template.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
