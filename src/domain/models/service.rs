//! Service domain model.
//!
//! A service is a priced catalog offering from a vendor. Prices read from
//! the store are authoritative; nothing outside the catalog may supply a
//! price for budget arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

pub const DEFAULT_SERVICE_TYPE: &str = "Standard";
pub const DEFAULT_SERVICE_DURATION: &str = "2HR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_type: String,
    pub duration: String,
    pub price: Money,
    pub image: String,
    pub vendor_id: Uuid,
    pub category_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(name: impl AsRef<str>, price: Money, vendor_id: Uuid, image: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.as_ref().trim().to_string(),
            description: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            duration: DEFAULT_SERVICE_DURATION.to_string(),
            price,
            image: image.into(),
            vendor_id,
            category_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Uuid>) -> Self {
        for category in categories {
            if !self.category_ids.contains(&category) {
                self.category_ids.push(category);
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name is required".to_string());
        }
        if self.price.is_negative() {
            return Err("price cannot be negative".to_string());
        }
        if self.image.trim().is_empty() {
            return Err("image is required".to_string());
        }
        Ok(())
    }
}

/// Partial update for a service.
#[derive(Debug, Clone, Default)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

impl ServiceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.category_ids.is_none()
    }

    pub fn apply(self, service: &mut Service) {
        if let Some(name) = self.name {
            service.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            service.price = price;
        }
        if let Some(description) = self.description {
            service.description = Some(description);
        }
        if let Some(image) = self.image {
            service.image = image;
        }
        if let Some(categories) = self.category_ids {
            service.category_ids.clear();
            for category in categories {
                if !service.category_ids.contains(&category) {
                    service.category_ids.push(category);
                }
            }
        }
        service.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Service::new(" DJ ", Money::from_units(200), Uuid::new_v4(), "dj.png");
        assert_eq!(s.name, "DJ");
        assert_eq!(s.service_type, "Standard");
        assert_eq!(s.duration, "2HR");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_category_membership() {
        let cat_a = Uuid::new_v4();
        let cat_b = Uuid::new_v4();
        let s = Service::new("Cake", Money::from_units(50), Uuid::new_v4(), "cake.png")
            .with_categories([cat_a, cat_a]);
        assert_eq!(s.category_ids, vec![cat_a]);

        let s = s.with_categories([cat_b]);
        assert_eq!(s.category_ids, vec![cat_a, cat_b]);
    }

    #[test]
    fn test_update_apply() {
        let cat = Uuid::new_v4();
        let mut s = Service::new("Cake", Money::from_units(50), Uuid::new_v4(), "cake.png");
        let id = s.id;
        ServiceUpdate {
            price: Some(Money::from_units(55)),
            category_ids: Some(vec![cat]),
            ..Default::default()
        }
        .apply(&mut s);
        assert_eq!(s.id, id);
        assert_eq!(s.name, "Cake");
        assert_eq!(s.price, Money::from_units(55));
        assert_eq!(s.category_ids, vec![cat]);
    }
}
