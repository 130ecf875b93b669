//! User domain model and caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Vendor,
    Couple,
    #[default]
    Normal,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Vendor => "vendor",
            Self::Couple => "couple",
            Self::Normal => "normal",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "vendor" => Some(Self::Vendor),
            "couple" => Some(Self::Couple),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }

    /// Admins and vendors manage the catalog; they do not plan events.
    pub fn can_plan_events(&self) -> bool {
        matches!(self, Self::Couple | Self::Normal)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role,
            image: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username cannot be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("invalid email: {}", self.email));
        }
        Ok(())
    }

    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// Partial update for a user account. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub image: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.role.is_none() && self.image.is_none()
    }

    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username.trim().to_string();
        }
        if let Some(email) = self.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(image) = self.image {
            user.image = Some(image);
        }
    }
}

/// The authenticated identity a request runs on behalf of.
///
/// Session issuance lives outside this crate; callers arrive already
/// resolved to a user id and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("Couple"), Some(UserRole::Couple));
        assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("guest"), None);
    }

    #[test]
    fn test_only_planners_can_plan() {
        assert!(UserRole::Normal.can_plan_events());
        assert!(UserRole::Couple.can_plan_events());
        assert!(!UserRole::Vendor.can_plan_events());
        assert!(!UserRole::Admin.can_plan_events());
    }

    #[test]
    fn test_validate_user() {
        assert!(User::new("sara", "sara@example.com", UserRole::Normal).validate().is_ok());
        assert!(User::new(" ", "sara@example.com", UserRole::Normal).validate().is_err());
        assert!(User::new("sara", "sara", UserRole::Normal).validate().is_err());
    }

    #[test]
    fn test_update_normalizes_email() {
        let mut user = User::new("sara", "sara@example.com", UserRole::Normal);
        UserUpdate {
            email: Some(" Sara@Work.COM ".to_string()),
            role: Some(UserRole::Couple),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.email, "sara@work.com");
        assert_eq!(user.role, UserRole::Couple);
        assert_eq!(user.username, "sara");
    }
}
