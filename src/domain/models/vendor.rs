//! Vendor domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business offering services, owned by a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Stored trimmed and lowercased; unique across vendors.
    pub business_name: String,
    pub bio: String,
    pub logo: String,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(
        user_id: Uuid,
        business_name: impl AsRef<str>,
        bio: impl AsRef<str>,
        logo: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            business_name: business_name.as_ref().trim().to_lowercase(),
            bio: bio.as_ref().trim().to_lowercase(),
            logo: logo.into(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.business_name.is_empty() {
            return Err("business name cannot be empty".to_string());
        }
        if self.bio.is_empty() {
            return Err("bio cannot be empty".to_string());
        }
        if self.logo.trim().is_empty() {
            return Err("logo is required".to_string());
        }
        Ok(())
    }
}

/// Partial update for a vendor. Names and bios are normalized the same way
/// as on creation.
#[derive(Debug, Clone, Default)]
pub struct VendorUpdate {
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub logo: Option<String>,
}

impl VendorUpdate {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none() && self.bio.is_none() && self.logo.is_none()
    }

    pub fn apply(self, vendor: &mut Vendor) {
        if let Some(name) = self.business_name {
            vendor.business_name = name.trim().to_lowercase();
        }
        if let Some(bio) = self.bio {
            vendor.bio = bio.trim().to_lowercase();
        }
        if let Some(logo) = self.logo {
            vendor.logo = logo;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_name_is_normalized() {
        let v = Vendor::new(Uuid::new_v4(), "  Rose Garden Catering ", "Fine food", "logo.png");
        assert_eq!(v.business_name, "rose garden catering");
        assert_eq!(v.bio, "fine food");
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_update_normalizes_name() {
        let mut v = Vendor::new(Uuid::new_v4(), "Rose", "Food", "logo.png");
        VendorUpdate {
            business_name: Some(" Rose Garden ".to_string()),
            ..Default::default()
        }
        .apply(&mut v);
        assert_eq!(v.business_name, "rose garden");
        assert_eq!(v.bio, "food");
    }
}
