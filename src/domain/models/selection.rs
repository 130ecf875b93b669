//! Suggestion results.
//!
//! A `Selection` is an advisory, never-persisted list of services with a
//! total recomputed from catalog prices. `Suggestion` tags a selection with
//! the strategy that produced it.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::{Money, Service};

/// Reason attached to every item picked by the fallback selector.
pub const FALLBACK_REASON: &str = "cheapest-first fallback";

/// Reason attached to oracle picks that came without one.
pub const ORACLE_DEFAULT_REASON: &str = "ranked by oracle";

/// One chosen service, priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: Uuid,
    pub name: String,
    pub price: Money,
    #[serde(rename = "type")]
    pub service_type: String,
    pub image: String,
    pub reason: String,
}

impl SelectedItem {
    pub fn from_service(service: &Service, reason: impl Into<String>) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            price: service.price,
            service_type: service.service_type.clone(),
            image: service.image.clone(),
            reason: reason.into(),
        }
    }
}

/// An ordered set of chosen services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Hard budget the selection was computed against (`None` = unbounded).
    pub budget: Option<Money>,
    pub items: Vec<SelectedItem>,
    pub total_price: Money,
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Selection {
    /// Build a selection whose total is the sum of the item prices.
    pub fn new(budget: Option<Money>, items: Vec<SelectedItem>) -> Self {
        let total_price = items.iter().map(|i| i.price).sum();
        Self {
            budget,
            items,
            total_price,
            rationale: None,
            notes: None,
        }
    }

    pub fn empty(budget: Option<Money>) -> Self {
        Self::new(budget, Vec::new())
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn service_ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|i| i.id).collect()
    }

    /// Whether the total respects the budget it was computed against.
    pub fn within_budget(&self) -> bool {
        self.budget.is_none_or(|b| self.total_price <= b)
    }
}

/// Provenance of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStrategy {
    Oracle,
    Fallback,
}

impl SuggestionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::Fallback => "fallback",
        }
    }
}

/// A selection tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Oracle(Selection),
    Fallback(Selection),
}

impl Suggestion {
    pub fn strategy(&self) -> SuggestionStrategy {
        match self {
            Self::Oracle(_) => SuggestionStrategy::Oracle,
            Self::Fallback(_) => SuggestionStrategy::Fallback,
        }
    }

    pub fn selection(&self) -> &Selection {
        match self {
            Self::Oracle(s) | Self::Fallback(s) => s,
        }
    }
}

impl Serialize for Suggestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let selection = self.selection();
        let fields = if selection.notes.is_some() { 6 } else { 5 };
        let mut state = serializer.serialize_struct("Suggestion", fields)?;
        state.serialize_field("strategy", &self.strategy())?;
        state.serialize_field("budget", &selection.budget)?;
        state.serialize_field("items", &selection.items)?;
        state.serialize_field("totalPrice", &selection.total_price)?;
        state.serialize_field("rationale", &selection.rationale)?;
        if let Some(notes) = &selection.notes {
            state.serialize_field("notes", notes)?;
        }
        state.end()
    }
}

/// Running totals after a service was committed to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCommit {
    pub event_id: Uuid,
    pub service_id: Uuid,
    pub budget: Money,
    pub previous_total: Money,
    pub added: Money,
    pub new_total: Money,
    pub remaining: Money,
}

impl BudgetCommit {
    pub fn new(event_id: Uuid, service_id: Uuid, budget: Money, previous_total: Money, added: Money) -> Self {
        let new_total = previous_total + added;
        Self {
            event_id,
            service_id,
            budget,
            previous_total,
            added,
            new_total,
            remaining: budget.saturating_sub(new_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64) -> SelectedItem {
        SelectedItem {
            id: Uuid::new_v4(),
            name: "svc".to_string(),
            price: Money::from_units(price),
            service_type: "Standard".to_string(),
            image: "svc.png".to_string(),
            reason: FALLBACK_REASON.to_string(),
        }
    }

    #[test]
    fn test_total_is_sum_of_items() {
        let s = Selection::new(Some(Money::from_units(100)), vec![item(40), item(30)]);
        assert_eq!(s.total_price, Money::from_units(70));
        assert!(s.within_budget());
    }

    #[test]
    fn test_unbounded_selection_is_within_budget() {
        let s = Selection::new(None, vec![item(1_000)]);
        assert!(s.within_budget());
    }

    #[test]
    fn test_suggestion_serializes_flat_with_strategy() {
        let suggestion = Suggestion::Fallback(Selection::empty(Some(Money::from_units(50))).with_rationale("none"));
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["strategy"], "fallback");
        assert_eq!(json["totalPrice"], 0.0);
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_item_serializes_type_field() {
        let json = serde_json::to_value(item(10)).unwrap();
        assert_eq!(json["type"], "Standard");
        assert_eq!(json["price"], 10.0);
    }

    #[test]
    fn test_budget_commit_totals() {
        let c = BudgetCommit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Money::from_units(100),
            Money::from_units(60),
            Money::from_units(35),
        );
        assert_eq!(c.new_total, Money::from_units(95));
        assert_eq!(c.remaining, Money::from_units(5));
    }
}
