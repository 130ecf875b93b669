//! Cheapest-first fallback selection.
//!
//! Total and deterministic: candidates are stably sorted by price and
//! accepted until the next one would push the running total over the hard
//! budget. Used whenever the oracle path is unavailable or invalid.

use crate::domain::models::{Money, SelectedItem, Selection, Service, FALLBACK_REASON};

pub const WITHIN_BUDGET_RATIONALE: &str = "Selected cheapest services that fit within the budget.";
pub const NO_BUDGET_RATIONALE: &str = "No budget provided; returned a cheapest-first set.";

/// Pick the cheapest candidates that fit within `hard_budget`.
pub fn select_cheapest(candidates: &[Service], hard_budget: Option<Money>) -> Selection {
    let mut ordered: Vec<&Service> = candidates.iter().collect();
    // `sort_by_key` is stable, so equal prices keep catalog order.
    ordered.sort_by_key(|s| s.price);

    let mut items = Vec::new();
    let mut total = Money::ZERO;
    for service in ordered {
        if let Some(budget) = hard_budget {
            if !total.fits_within(service.price, budget) {
                break;
            }
        }
        total += service.price;
        items.push(SelectedItem::from_service(service, FALLBACK_REASON));
    }

    let rationale = if hard_budget.is_some() {
        WITHIN_BUDGET_RATIONALE
    } else {
        NO_BUDGET_RATIONALE
    };
    Selection::new(hard_budget, items).with_rationale(rationale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn svc(name: &str, units: i64) -> Service {
        Service::new(name, Money::from_units(units), Uuid::nil(), "x.png")
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_cheapest_first_until_budget() {
        let candidates = vec![svc("Band", 50), svc("Cake", 20), svc("DJ", 30), svc("Flowers", 10)];
        let s = select_cheapest(&candidates, Some(Money::from_units(65)));
        assert_eq!(names(&s), vec!["Flowers", "Cake", "DJ"]);
        assert_eq!(s.total_price, Money::from_units(60));
        assert!(s.items.iter().all(|i| i.reason == FALLBACK_REASON));
        assert_eq!(s.rationale.as_deref(), Some(WITHIN_BUDGET_RATIONALE));
    }

    #[test]
    fn test_stops_at_first_overflow() {
        // 10 + 30 fits 45; 40 would overflow, and nothing after it is tried.
        let candidates = vec![svc("A", 10), svc("B", 30), svc("C", 40), svc("D", 41)];
        let s = select_cheapest(&candidates, Some(Money::from_units(45)));
        assert_eq!(names(&s), vec!["A", "B"]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let candidates = vec![svc("X", 5), svc("Y", 5), svc("Z", 1)];
        let s = select_cheapest(&candidates, None);
        assert_eq!(names(&s), vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_unbounded_accepts_everything() {
        let candidates = vec![svc("A", 500), svc("B", 100)];
        let s = select_cheapest(&candidates, None);
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.total_price, Money::from_units(600));
        assert_eq!(s.rationale.as_deref(), Some(NO_BUDGET_RATIONALE));
    }

    #[test]
    fn test_zero_budget_accepts_only_free_items() {
        let candidates = vec![svc("Free", 0), svc("Paid", 1)];
        let s = select_cheapest(&candidates, Some(Money::ZERO));
        assert_eq!(names(&s), vec!["Free"]);
        assert_eq!(s.total_price, Money::ZERO);
    }

    #[test]
    fn test_empty_candidates() {
        let s = select_cheapest(&[], Some(Money::from_units(10)));
        assert!(s.is_empty());
        assert_eq!(s.total_price, Money::ZERO);
    }
}
