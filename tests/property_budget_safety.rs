use planora::domain::models::{Money, Service};
use planora::services::{select_cheapest, validate};
use proptest::prelude::*;
use serde_json::json;
use test_strategy::proptest as property;
use uuid::Uuid;

fn catalog(prices: &[i64]) -> Vec<Service> {
    let vendor = Uuid::new_v4();
    prices
        .iter()
        .enumerate()
        .map(|(i, cents)| Service::new(format!("Service {i}"), Money::from_cents(*cents), vendor, "s.png"))
        .collect()
}

proptest! {
    /// Property: the fallback never spends more than the budget
    #[test]
    fn prop_fallback_within_budget(
        prices in prop::collection::vec(0i64..50_000, 0..30),
        budget in 0i64..100_000,
    ) {
        let services = catalog(&prices);
        let budget = Money::from_cents(budget);
        let selection = select_cheapest(&services, Some(budget));

        prop_assert!(selection.total_price <= budget);
        prop_assert_eq!(
            selection.total_price,
            selection.items.iter().map(|i| i.price).sum::<Money>()
        );
    }

    /// Property: the fallback picks a cheapest-first prefix
    ///
    /// Items come out in non-decreasing price order and the next cheapest
    /// candidate, if any, would have broken the budget.
    #[test]
    fn prop_fallback_is_cheapest_prefix(
        prices in prop::collection::vec(0i64..50_000, 1..30),
        budget in 0i64..100_000,
    ) {
        let services = catalog(&prices);
        let budget = Money::from_cents(budget);
        let selection = select_cheapest(&services, Some(budget));

        let picked: Vec<i64> = selection.items.iter().map(|i| i.price.cents()).collect();
        prop_assert!(picked.windows(2).all(|w| w[0] <= w[1]));

        let mut sorted = prices.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&picked[..], &sorted[..picked.len()]);
        if let Some(next) = sorted.get(picked.len()) {
            prop_assert!(selection.total_price.cents() + next > budget.cents());
        }
    }

    /// Property: whatever ids the oracle returns, a validated selection
    /// stays within budget and only holds catalog services, once each
    #[test]
    fn prop_validated_selection_is_safe(
        prices in prop::collection::vec(0i64..50_000, 1..20),
        picks in prop::collection::vec(0usize..40, 0..40),
        budget in 0i64..100_000,
    ) {
        let services = catalog(&prices);
        let budget = Money::from_cents(budget);

        // Indices past the catalog stand in for hallucinated ids.
        let ids: Vec<String> = picks
            .iter()
            .map(|i| services.get(*i).map_or_else(|| Uuid::new_v4().to_string(), |s| s.id.to_string()))
            .collect();
        let raw = json!({ "selection": ids }).to_string();

        if let Ok(selection) = validate(&raw, &services, Some(budget)) {
            prop_assert!(!selection.items.is_empty());
            prop_assert!(selection.total_price <= budget);

            let mut seen = std::collections::HashSet::new();
            for item in &selection.items {
                let source = services.iter().find(|s| s.id == item.id);
                prop_assert!(source.is_some());
                prop_assert_eq!(source.map(|s| s.price), Some(item.price));
                prop_assert!(seen.insert(item.id));
            }
        }
    }
}

/// Property: the fallback is deterministic for a given catalog
#[property]
fn prop_fallback_is_deterministic(
    #[strategy(prop::collection::vec(0i64..10_000, 0..25))] prices: Vec<i64>,
    #[strategy(0i64..50_000)] budget: i64,
) {
    let services = catalog(&prices);
    let budget = Some(Money::from_cents(budget));
    prop_assert_eq!(select_cheapest(&services, budget), select_cheapest(&services, budget));
}

/// Property: without a budget every candidate is returned
#[property]
fn prop_unbounded_fallback_takes_everything(#[strategy(prop::collection::vec(0i64..10_000, 0..25))] prices: Vec<i64>) {
    let services = catalog(&prices);
    let selection = select_cheapest(&services, None);
    prop_assert_eq!(selection.items.len(), services.len());
    prop_assert_eq!(selection.total_price.cents(), prices.iter().sum::<i64>());
}
