//! Event domain model.
//!
//! An event belongs to the user who created it and carries a hard budget.
//! The sum of the prices of its services is checked against that budget at
//! the moment a service is added; later price changes are not reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Money, Service};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub budget: Money,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Associated services in the order they were added.
    pub service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(user_id: Uuid, budget: Money, date: DateTime<Utc>, location: impl AsRef<str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            budget,
            date,
            location: location.as_ref().trim().to_string(),
            service_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.budget.is_negative() {
            return Err("budget cannot be negative".to_string());
        }
        if self.location.is_empty() {
            return Err("location is required".to_string());
        }
        Ok(())
    }
}

/// Partial update for an event. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub budget: Option<Money>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.budget.is_none() && self.date.is_none() && self.location.is_none()
    }

    pub fn apply(self, event: &mut Event) {
        if let Some(budget) = self.budget {
            event.budget = budget;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location.trim().to_string();
        }
        event.updated_at = Utc::now();
    }
}

/// Counts of a user's events around the start of the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub total: u64,
    pub upcoming: u64,
    pub old: u64,
}

/// An event with the number of services attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub event: Event,
    pub service_count: u64,
}

/// An event's services priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventServices {
    pub event_id: Uuid,
    pub budget: Money,
    pub services: Vec<Service>,
    pub total_price: Money,
    /// Budget left over, zero once the event is fully spent or overspent.
    pub remaining: Money,
}

impl EventServices {
    pub fn new(event: &Event, services: Vec<Service>) -> Self {
        let total_price: Money = services.iter().map(|s| s.price).sum();
        Self {
            event_id: event.id,
            budget: event.budget,
            remaining: event.budget.saturating_sub(total_price).max(Money::ZERO),
            services,
            total_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_trims_location() {
        let e = Event::new(Uuid::new_v4(), Money::from_units(100), Utc::now(), "  Kuwait City ");
        assert_eq!(e.location, "Kuwait City");
        assert!(e.validate().is_ok());
    }

    #[test]
    fn test_blank_location_rejected() {
        let e = Event::new(Uuid::new_v4(), Money::from_units(100), Utc::now(), "   ");
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_update_leaves_untouched_fields() {
        let mut e = Event::new(Uuid::new_v4(), Money::from_units(100), Utc::now(), "Hall");
        let date = e.date;
        EventUpdate {
            budget: Some(Money::from_units(250)),
            ..Default::default()
        }
        .apply(&mut e);
        assert_eq!(e.budget, Money::from_units(250));
        assert_eq!(e.date, date);
        assert_eq!(e.location, "Hall");
    }

    #[test]
    fn test_event_services_totals() {
        let e = Event::new(Uuid::new_v4(), Money::from_units(100), Utc::now(), "Hall");
        let vendor = Uuid::new_v4();
        let services = vec![
            Service::new("A", Money::from_units(30), vendor, "a.png"),
            Service::new("B", Money::from_units(25), vendor, "b.png"),
        ];
        let view = EventServices::new(&e, services);
        assert_eq!(view.total_price, Money::from_units(55));
        assert_eq!(view.remaining, Money::from_units(45));
    }

    #[test]
    fn test_remaining_never_negative_after_budget_cut() {
        let mut e = Event::new(Uuid::new_v4(), Money::from_units(100), Utc::now(), "Hall");
        let services = vec![Service::new("A", Money::from_units(80), Uuid::new_v4(), "a.png")];
        EventUpdate {
            budget: Some(Money::from_units(50)),
            ..Default::default()
        }
        .apply(&mut e);

        let view = EventServices::new(&e, services);
        assert_eq!(view.total_price, Money::from_units(80));
        assert_eq!(view.remaining, Money::ZERO);
    }
}
