//! Application services.
//!
//! The suggestion engine is split into catalog filtering, oracle prompt
//! construction, reply validation, the fallback selector and the
//! orchestrator that composes them. The remaining services wrap the
//! repositories with validation and ownership rules.

pub mod catalog_filter;
pub mod catalog_service;
pub mod event_service;
pub mod fallback_selector;
pub mod gift_card_service;
pub mod invite_service;
pub mod notification_service;
pub mod oracle_prompt;
pub mod response_validator;
pub mod suggestion_service;
pub mod user_service;

pub use catalog_filter::CatalogFilter;
pub use catalog_service::{CatalogService, NewService};
pub use event_service::EventService;
pub use fallback_selector::select_cheapest;
pub use gift_card_service::{GiftCardService, NewGiftCard};
pub use invite_service::{InviteService, NewInviteTemplate};
pub use notification_service::NotificationService;
pub use response_validator::{validate, ValidationFailure};
pub use suggestion_service::{BudgetCap, SuggestionRequest, SuggestionService, EMPTY_CATALOG_RATIONALE};
pub use user_service::UserService;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Caller;

/// Reject callers that are not admins.
pub(crate) fn require_admin(caller: Caller, action: &str) -> DomainResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!("only admins can {action}")))
    }
}
