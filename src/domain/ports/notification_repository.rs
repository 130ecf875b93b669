//! Notification repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Notification>>;

    /// A user's notifications, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>>;

    /// Notifications a vendor has sent, newest first.
    async fn list_for_vendor(&self, vendor_id: Uuid) -> DomainResult<Vec<Notification>>;

    async fn mark_read(&self, id: Uuid) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
