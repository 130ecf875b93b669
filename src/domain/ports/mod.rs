//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - Repositories over the document store (events, services, categories,
//!   vendors, users, invites, invite templates, gift cards, notifications)
//! - RankingOracle: the external ranking service behind suggestions

pub mod category_repository;
pub mod event_repository;
pub mod gift_card_repository;
pub mod invite_repository;
pub mod invite_template_repository;
pub mod notification_repository;
pub mod ranking_oracle;
pub mod service_repository;
pub mod user_repository;
pub mod vendor_repository;

pub use category_repository::CategoryRepository;
pub use event_repository::EventRepository;
pub use gift_card_repository::GiftCardRepository;
pub use invite_repository::InviteRepository;
pub use invite_template_repository::InviteTemplateRepository;
pub use notification_repository::NotificationRepository;
pub use ranking_oracle::{OracleError, RankingOracle, RankingRequest};
pub use service_repository::{ServiceFilter, ServiceRepository};
pub use user_repository::UserRepository;
pub use vendor_repository::VendorRepository;
