pub mod category;
pub mod config;
pub mod event;
pub mod gift_card;
pub mod invite;
pub mod invite_template;
pub mod money;
pub mod notification;
pub mod selection;
pub mod service;
pub mod user;
pub mod vendor;

pub use category::Category;
pub use config::{
    Config, DatabaseConfig, LoggingConfig, OracleConfig, OracleProvider, SelectionConfig,
};
pub use event::{Event, EventServices, EventStats, EventSummary, EventUpdate};
pub use gift_card::{GiftCard, GiftCardStatus, GiftCardUpdate};
pub use invite::{Invite, InviteUpdate, RsvpStatus};
pub use invite_template::{InviteTemplate, InviteTemplateUpdate};
pub use money::{Money, MoneyParseError};
pub use notification::{Notification, NotificationKind};
pub use selection::{
    BudgetCommit, SelectedItem, Selection, Suggestion, SuggestionStrategy, FALLBACK_REASON,
    ORACLE_DEFAULT_REASON,
};
pub use service::{Service, ServiceUpdate, DEFAULT_SERVICE_DURATION, DEFAULT_SERVICE_TYPE};
pub use user::{Caller, User, UserRole, UserUpdate};
pub use vendor::{Vendor, VendorUpdate};
