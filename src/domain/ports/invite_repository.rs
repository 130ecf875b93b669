//! Invite repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Invite;

#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Create an invite. Fails with `DuplicateInvite` when the guest email is
    /// already invited to the event.
    async fn create(&self, invite: &Invite) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Invite>>;

    /// Look up the invite a guest token belongs to.
    async fn get_by_token(&self, token: &str) -> DomainResult<Option<Invite>>;

    /// Every invite, oldest first.
    async fn list(&self) -> DomainResult<Vec<Invite>>;

    async fn list_by_event(&self, event_id: Uuid) -> DomainResult<Vec<Invite>>;

    async fn update(&self, invite: &Invite) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
