//! Guest invitations.
//!
//! Each invite carries an opaque token the guest uses to answer without an
//! account. A guest email can be invited to a given event only once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guest's answer to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Attending,
    NotAttending,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Attending => "attending",
            Self::NotAttending => "not_attending",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "attending" | "yes" => Some(Self::Attending),
            "not_attending" | "notattending" | "no" => Some(Self::NotAttending),
            _ => None,
        }
    }

    /// Whether this is an answer a guest can give.
    pub fn is_answer(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub event_id: Uuid,
    pub guest_name: String,
    /// Stored trimmed and lowercased.
    pub guest_email: String,
    pub rsvp_status: RsvpStatus,
    pub token: String,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invite {
    pub fn new(event_id: Uuid, guest_name: impl AsRef<str>, guest_email: impl AsRef<str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            guest_name: guest_name.as_ref().trim().to_string(),
            guest_email: normalize_email(guest_email.as_ref()),
            rsvp_status: RsvpStatus::Pending,
            token: Uuid::new_v4().simple().to_string(),
            template_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_template(mut self, template_id: Uuid) -> Self {
        self.template_id = Some(template_id);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.guest_name.is_empty() {
            return Err("guest name cannot be empty".to_string());
        }
        if !self.guest_email.contains('@') {
            return Err(format!("invalid guest email: {}", self.guest_email));
        }
        Ok(())
    }
}

/// Partial update for an invite. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct InviteUpdate {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub rsvp_status: Option<RsvpStatus>,
    pub template_id: Option<Uuid>,
}

impl InviteUpdate {
    pub fn is_empty(&self) -> bool {
        self.guest_name.is_none()
            && self.guest_email.is_none()
            && self.rsvp_status.is_none()
            && self.template_id.is_none()
    }

    pub fn apply(self, invite: &mut Invite) {
        if let Some(name) = self.guest_name {
            invite.guest_name = name.trim().to_string();
        }
        if let Some(email) = self.guest_email {
            invite.guest_email = normalize_email(&email);
        }
        if let Some(status) = self.rsvp_status {
            invite.rsvp_status = status;
        }
        if let Some(template_id) = self.template_id {
            invite.template_id = Some(template_id);
        }
        invite.updated_at = Utc::now();
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
