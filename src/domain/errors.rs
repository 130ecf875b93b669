//! Domain errors for the Planora event planning backend.

use thiserror::Error;
use uuid::Uuid;

use super::models::Money;

/// Domain-level errors that can occur in Planora.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(
        "Over budget: adding a service priced {price} to a running total of {current_total} exceeds the budget of {budget}"
    )]
    OverBudget {
        budget: Money,
        current_total: Money,
        price: Money,
    },

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Service not found: {0}")]
    ServiceNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Vendor not found: {0}")]
    VendorNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("No user with email {0}")]
    UserEmailNotFound(String),

    #[error("Invite not found: {0}")]
    InviteNotFound(Uuid),

    #[error("No invite matches token {0}")]
    InviteTokenNotFound(String),

    #[error("Invite template not found: {0}")]
    InviteTemplateNotFound(Uuid),

    #[error("Gift card not found: {0}")]
    GiftCardNotFound(Uuid),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    #[error("{guest_email} is already invited to event {event_id}")]
    DuplicateInvite { event_id: Uuid, guest_email: String },

    #[error("Service {service_id} is already part of event {event_id}")]
    DuplicateService { event_id: Uuid, service_id: Uuid },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error is an authorization rejection.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    /// Whether the error names a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_)
                | Self::ServiceNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::VendorNotFound(_)
                | Self::UserNotFound(_)
                | Self::UserEmailNotFound(_)
                | Self::InviteNotFound(_)
                | Self::InviteTokenNotFound(_)
                | Self::InviteTemplateNotFound(_)
                | Self::GiftCardNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
