//! Vendor-to-user notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A message from a vendor to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, vendor_id: Uuid, title: impl AsRef<str>, message: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            vendor_id,
            title: title.as_ref().trim().to_string(),
            message: message.as_ref().trim().to_string(),
            kind: NotificationKind::Info,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_kind(mut self, kind: NotificationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("notification title cannot be empty".to_string());
        }
        if self.message.is_empty() {
            return Err("notification message cannot be empty".to_string());
        }
        Ok(())
    }
}
