//! Validation of untrusted oracle replies.
//!
//! The reply is parsed into a generic JSON value and picked apart field by
//! field. Nothing the oracle says about prices is used: every accepted id is
//! re-priced from the candidate set, and the hard budget is re-checked in
//! the order the oracle listed the items.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{Money, SelectedItem, Selection, Service, ORACLE_DEFAULT_REASON};

const SELECTION_FIELDS: [&str; 3] = ["selection", "items", "services"];
const ID_FIELDS: [&str; 3] = ["id", "_id", "serviceId"];

/// Why an oracle reply was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("oracle reply is not parseable JSON")]
    Unparseable,

    #[error("oracle reply has no selection list")]
    MissingSelection,

    #[error("oracle selection yields no usable items within budget")]
    NothingUsable,
}

/// Turn a raw oracle reply into a budget-safe selection.
pub fn validate(raw: &str, candidates: &[Service], hard_budget: Option<Money>) -> Result<Selection, ValidationFailure> {
    let parsed = parse_reply(raw).ok_or(ValidationFailure::Unparseable)?;

    let entries = SELECTION_FIELDS
        .iter()
        .find_map(|field| parsed.get(*field).and_then(Value::as_array))
        .ok_or(ValidationFailure::MissingSelection)?;

    let by_id: HashMap<Uuid, &Service> = candidates.iter().map(|s| (s.id, s)).collect();
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut total = Money::ZERO;

    for (id, reason) in entries.iter().filter_map(entry_id_and_reason) {
        let Some(service) = by_id.get(&id) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        if let Some(budget) = hard_budget {
            if !total.fits_within(service.price, budget) {
                break;
            }
        }
        total += service.price;
        items.push(SelectedItem::from_service(
            service,
            reason.unwrap_or_else(|| ORACLE_DEFAULT_REASON.to_string()),
        ));
    }

    if items.is_empty() {
        return Err(ValidationFailure::NothingUsable);
    }

    let mut selection = Selection::new(hard_budget, items);
    selection.rationale = string_field(&parsed, "rationale");
    selection.notes = string_field(&parsed, "notes");
    Ok(selection)
}

/// Parse directly, then retry on the outermost brace-delimited span.
fn parse_reply(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

fn entry_id_and_reason(entry: &Value) -> Option<(Uuid, Option<String>)> {
    match entry {
        Value::String(id) => parse_id(id).map(|id| (id, None)),
        Value::Object(map) => {
            let id = ID_FIELDS
                .iter()
                .find_map(|field| map.get(*field).and_then(Value::as_str).and_then(parse_id))?;
            let reason = map
                .get("reason")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string);
            Some((id, reason))
        }
        _ => None,
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn svc(name: &str, units: i64) -> Service {
        Service::new(name, Money::from_units(units), Uuid::nil(), "x.png")
    }

    fn reply(ids: &[Uuid]) -> String {
        let selection: Vec<_> = ids.iter().map(|id| json!({"id": id, "reason": "good fit"})).collect();
        json!({"selection": selection, "rationale": "fits", "notes": "n/a"}).to_string()
    }

    #[test]
    fn test_greedy_truncation_keeps_oracle_order() {
        let (a, b, c) = (svc("A", 40), svc("B", 30), svc("C", 20));
        let candidates = vec![a.clone(), b.clone(), c.clone()];
        let s = validate(&reply(&[a.id, b.id, c.id]), &candidates, Some(Money::from_units(80))).unwrap();
        assert_eq!(s.service_ids(), vec![a.id, b.id]);
        assert_eq!(s.total_price, Money::from_units(70));
        assert_eq!(s.rationale.as_deref(), Some("fits"));
        assert_eq!(s.notes.as_deref(), Some("n/a"));
    }

    #[test]
    fn test_stops_even_when_later_item_is_affordable() {
        let (a, b, c) = (svc("A", 50), svc("B", 40), svc("C", 5));
        let candidates = vec![a.clone(), b.clone(), c.clone()];
        let s = validate(&reply(&[a.id, b.id, c.id]), &candidates, Some(Money::from_units(60))).unwrap();
        assert_eq!(s.service_ids(), vec![a.id]);
    }

    #[test]
    fn test_prices_come_from_candidates() {
        let a = svc("A", 40);
        let raw = json!({"selection": [{"id": a.id, "price": 1}]}).to_string();
        let s = validate(&raw, &[a.clone()], Some(Money::from_units(100))).unwrap();
        assert_eq!(s.total_price, Money::from_units(40));
        assert_eq!(s.items[0].reason, ORACLE_DEFAULT_REASON);
    }

    #[test]
    fn test_unknown_and_duplicate_ids_are_dropped() {
        let a = svc("A", 10);
        let b = svc("B", 10);
        let raw = reply(&[Uuid::new_v4(), a.id, a.id, b.id]);
        let s = validate(&raw, &[a.clone(), b.clone()], None).unwrap();
        assert_eq!(s.service_ids(), vec![a.id, b.id]);
    }

    #[test]
    fn test_accepts_prose_around_json() {
        let a = svc("A", 10);
        let raw = format!("Sure! Here you go:\n```json\n{}\n```", reply(&[a.id]));
        let s = validate(&raw, &[a.clone()], None).unwrap();
        assert_eq!(s.items.len(), 1);
    }

    #[test]
    fn test_alternate_shapes() {
        let a = svc("A", 10);
        let b = svc("B", 10);
        let raw = json!({"items": [a.id.to_string(), {"_id": b.id}, 42, null]}).to_string();
        let s = validate(&raw, &[a.clone(), b.clone()], None).unwrap();
        assert_eq!(s.service_ids(), vec![a.id, b.id]);

        let raw = json!({"services": [{"serviceId": b.id, "reason": "cheap"}]}).to_string();
        let s = validate(&raw, &[b.clone()], None).unwrap();
        assert_eq!(s.items[0].reason, "cheap");
    }

    #[test]
    fn test_malformed_id_falls_through_to_next_alias() {
        let a = svc("A", 10);
        let raw = json!({"selection": [{"id": "DJ", "serviceId": a.id}]}).to_string();
        let s = validate(&raw, &[a.clone()], None).unwrap();
        assert_eq!(s.service_ids(), vec![a.id]);
    }

    #[test]
    fn test_failures() {
        let a = svc("A", 10);
        let candidates = vec![a.clone()];
        assert_eq!(validate("not json at all", &candidates, None), Err(ValidationFailure::Unparseable));
        assert_eq!(validate("} {", &candidates, None), Err(ValidationFailure::Unparseable));
        assert_eq!(
            validate(r#"{"picks": []}"#, &candidates, None),
            Err(ValidationFailure::MissingSelection)
        );
        assert_eq!(
            validate(r#"{"selection": "all"}"#, &candidates, None),
            Err(ValidationFailure::MissingSelection)
        );
        assert_eq!(
            validate(&reply(&[Uuid::new_v4()]), &candidates, None),
            Err(ValidationFailure::NothingUsable)
        );
        assert_eq!(
            validate(&reply(&[a.id]), &candidates, Some(Money::from_units(5))),
            Err(ValidationFailure::NothingUsable)
        );
    }

    #[test]
    fn test_non_string_rationale_is_ignored() {
        let a = svc("A", 10);
        let raw = json!({"selection": [a.id], "rationale": 7}).to_string();
        let s = validate(&raw, &[a.clone()], None).unwrap();
        assert!(s.rationale.is_none());
    }
}
