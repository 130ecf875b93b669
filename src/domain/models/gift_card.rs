//! Gift cards sent to couples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GiftCardStatus {
    #[default]
    Active,
    Redeemed,
    Expired,
}

impl GiftCardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "redeemed" => Some(Self::Redeemed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub couple_id: Uuid,
    pub event_id: Option<Uuid>,
    pub amount: Money,
    pub status: GiftCardStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GiftCard {
    pub fn new(sender_id: Uuid, couple_id: Uuid, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender_id,
            couple_id,
            event_id: None,
            amount,
            status: GiftCardStatus::Active,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_event(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.amount.is_negative() {
            return Err("gift card amount cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Partial update for a gift card. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct GiftCardUpdate {
    pub amount: Option<Money>,
    pub event_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: Option<GiftCardStatus>,
}

impl GiftCardUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.event_id.is_none() && self.expires_at.is_none() && self.status.is_none()
    }

    pub fn apply(self, card: &mut GiftCard) {
        if let Some(amount) = self.amount {
            card.amount = amount;
        }
        if let Some(event_id) = self.event_id {
            card.event_id = Some(event_id);
        }
        if let Some(expires_at) = self.expires_at {
            card.expires_at = Some(expires_at);
        }
        if let Some(status) = self.status {
            card.status = status;
        }
        card.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_active() {
        let card = GiftCard::new(Uuid::new_v4(), Uuid::new_v4(), Money::from_units(250));
        assert_eq!(card.status, GiftCardStatus::Active);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let card = GiftCard::new(Uuid::new_v4(), Uuid::new_v4(), Money::from_cents(-1));
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(GiftCardStatus::from_str("Expired"), Some(GiftCardStatus::Expired));
        assert_eq!(GiftCardStatus::from_str("spent"), None);
    }
}
