//! Ranking request construction.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::{Money, Service};
use crate::domain::ports::RankingRequest;

const RULES: &str = "You are an event planning assistant. Choose services for an event from the candidate list.
Rules:
- Never let the total price exceed hardBudget when hardBudget is provided.
- Prefer lower prices within the budget.
- Only use ids that appear in the candidate list.
- List the services in order of priority, most important first.
- Reply with JSON only, in exactly this shape:
{ \"selection\": [{\"id\": \"<candidate id>\", \"reason\": \"<short reason>\"}], \"rationale\": \"<one sentence>\", \"notes\": \"<optional notes>\" }";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    hard_budget: Option<Money>,
    candidates: Vec<Candidate<'a>>,
}

#[derive(Debug, Serialize)]
struct Candidate<'a> {
    id: Uuid,
    name: &'a str,
    price: Money,
    category: &'a [Uuid],
    #[serde(rename = "type")]
    service_type: &'a str,
}

/// Build the oracle request for a candidate set.
pub fn build_request(candidates: &[Service], hard_budget: Option<Money>) -> RankingRequest {
    let payload = Payload {
        hard_budget,
        candidates: candidates
            .iter()
            .map(|s| Candidate {
                id: s.id,
                name: &s.name,
                price: s.price,
                category: &s.category_ids,
                service_type: &s.service_type,
            })
            .collect(),
    };

    RankingRequest {
        prompt: RULES.to_string(),
        payload: serde_json::to_value(payload).unwrap_or_default(),
    }
}
