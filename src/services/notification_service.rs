//! Vendor-to-user notifications.
//!
//! Vendors notify users; recipients read and dismiss their own messages.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Caller, Notification, NotificationKind, Vendor};
use crate::domain::ports::{NotificationRepository, UserRepository, VendorRepository};

pub struct NotificationService<N, U, V>
where
    N: NotificationRepository,
    U: UserRepository,
    V: VendorRepository,
{
    notifications: Arc<N>,
    users: Arc<U>,
    vendors: Arc<V>,
}

impl<N, U, V> NotificationService<N, U, V>
where
    N: NotificationRepository,
    U: UserRepository,
    V: VendorRepository,
{
    pub fn new(notifications: Arc<N>, users: Arc<U>, vendors: Arc<V>) -> Self {
        Self {
            notifications,
            users,
            vendors,
        }
    }

    /// Send a notification from one of the caller's vendors.
    pub async fn notify(
        &self,
        caller: Caller,
        vendor_id: Uuid,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> DomainResult<Notification> {
        self.managed_vendor(caller, vendor_id).await?;
        if self.users.get(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id));
        }

        let notification = Notification::new(user_id, vendor_id, title, message).with_kind(kind);
        notification.validate().map_err(DomainError::ValidationFailed)?;
        self.notifications.create(&notification).await?;

        info!(notification_id = %notification.id, user_id = %user_id, "notification sent");
        Ok(notification)
    }

    /// The caller's notifications, newest first.
    pub async fn list_mine(&self, caller: Caller) -> DomainResult<Vec<Notification>> {
        self.notifications.list_for_user(caller.user_id).await
    }

    /// What a vendor has sent, newest first.
    pub async fn list_sent(&self, caller: Caller, vendor_id: Uuid) -> DomainResult<Vec<Notification>> {
        self.managed_vendor(caller, vendor_id).await?;
        self.notifications.list_for_vendor(vendor_id).await
    }

    pub async fn mark_read(&self, caller: Caller, id: Uuid) -> DomainResult<()> {
        self.received(caller, id).await?;
        self.notifications.mark_read(id).await
    }

    pub async fn delete(&self, caller: Caller, id: Uuid) -> DomainResult<()> {
        self.received(caller, id).await?;
        self.notifications.delete(id).await
    }

    async fn received(&self, caller: Caller, id: Uuid) -> DomainResult<Notification> {
        let notification = self
            .notifications
            .get(id)
            .await?
            .ok_or(DomainError::NotificationNotFound(id))?;
        if notification.user_id != caller.user_id {
            return Err(DomainError::Forbidden(format!(
                "notification {id} was not sent to the caller"
            )));
        }
        Ok(notification)
    }

    async fn managed_vendor(&self, caller: Caller, vendor_id: Uuid) -> DomainResult<Vendor> {
        let vendor = self.vendors.get(vendor_id).await?.ok_or(DomainError::VendorNotFound(vendor_id))?;
        if vendor.user_id != caller.user_id && !caller.is_admin() {
            return Err(DomainError::Forbidden(format!(
                "vendor {vendor_id} does not belong to the caller"
            )));
        }
        Ok(vendor)
    }
}
