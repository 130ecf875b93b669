//! Selection orchestrator.
//!
//! Composes catalog filtering, the ranking oracle, reply validation and the
//! fallback selector into one read-only suggestion operation. Oracle and
//! validation failures never leave this module; callers see a tagged
//! suggestion or an authorization / lookup error.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::catalog_filter::CatalogFilter;
use super::fallback_selector::select_cheapest;
use super::oracle_prompt::build_request;
use super::response_validator::{validate, ValidationFailure};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Caller, Money, SelectionConfig, Selection, Service, Suggestion};
use crate::domain::ports::{EventRepository, OracleError, RankingOracle, ServiceRepository};

pub const EMPTY_CATALOG_RATIONALE: &str = "No services match the requested categories and budget.";

/// Which hard budget a suggestion is computed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BudgetCap {
    /// The event's stored budget.
    #[default]
    EventBudget,
    Fixed(Money),
    /// No ceiling; the fallback returns every candidate cheapest-first.
    Unbounded,
}

#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub event_id: Uuid,
    pub required_categories: Vec<Uuid>,
    pub budget: BudgetCap,
}

impl SuggestionRequest {
    pub fn for_event(event_id: Uuid) -> Self {
        Self {
            event_id,
            required_categories: Vec::new(),
            budget: BudgetCap::default(),
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Uuid>) -> Self {
        self.required_categories.extend(categories);
        self
    }

    pub fn with_budget(mut self, budget: BudgetCap) -> Self {
        self.budget = budget;
        self
    }
}

/// Why the oracle path was abandoned.
#[derive(Debug, Error)]
enum OracleAbandoned {
    #[error(transparent)]
    Unavailable(#[from] OracleError),
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
}

pub struct SuggestionService<E: EventRepository, S: ServiceRepository> {
    events: Arc<E>,
    services: Arc<S>,
    oracle: Arc<dyn RankingOracle>,
    filter: CatalogFilter,
    oracle_timeout: Duration,
}

impl<E: EventRepository, S: ServiceRepository> SuggestionService<E, S> {
    pub fn new(
        events: Arc<E>,
        services: Arc<S>,
        oracle: Arc<dyn RankingOracle>,
        selection: SelectionConfig,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            events,
            services,
            oracle,
            filter: CatalogFilter::new(selection),
            oracle_timeout,
        }
    }

    /// Suggest services for an event owned by `caller`.
    #[instrument(skip(self, request), fields(event_id = %request.event_id, user_id = %caller.user_id))]
    pub async fn suggest(&self, caller: Caller, request: SuggestionRequest) -> DomainResult<Suggestion> {
        let event = self
            .events
            .get(request.event_id)
            .await?
            .ok_or(DomainError::EventNotFound(request.event_id))?;

        if !event.is_owned_by(caller.user_id) {
            return Err(DomainError::Forbidden(format!(
                "event {} does not belong to the caller",
                event.id
            )));
        }

        let hard_budget = match request.budget {
            BudgetCap::EventBudget => Some(event.budget),
            BudgetCap::Fixed(amount) => Some(amount),
            BudgetCap::Unbounded => None,
        };

        let candidates = self
            .filter
            .candidates(self.services.as_ref(), &request.required_categories, hard_budget)
            .await?;
        debug!(candidates = candidates.len(), "catalog filtered");

        if candidates.is_empty() {
            info!(strategy = "fallback", "no candidates, skipping oracle");
            return Ok(Suggestion::Fallback(
                Selection::empty(hard_budget).with_rationale(EMPTY_CATALOG_RATIONALE),
            ));
        }

        match self.consult_oracle(&candidates, hard_budget).await {
            Ok(selection) => {
                info!(strategy = "oracle", items = selection.items.len(), total = %selection.total_price, "suggestion ready");
                Ok(Suggestion::Oracle(selection))
            }
            Err(reason) => {
                warn!(oracle = self.oracle.name(), error = %reason, "oracle path abandoned, using fallback");
                let selection = select_cheapest(&candidates, hard_budget);
                info!(strategy = "fallback", items = selection.items.len(), total = %selection.total_price, "suggestion ready");
                Ok(Suggestion::Fallback(selection))
            }
        }
    }

    async fn consult_oracle(
        &self,
        candidates: &[Service],
        hard_budget: Option<Money>,
    ) -> Result<Selection, OracleAbandoned> {
        let request = build_request(candidates, hard_budget);
        let raw = tokio::time::timeout(self.oracle_timeout, self.oracle.rank(&request))
            .await
            .map_err(|_| OracleError::Timeout(self.oracle_timeout.as_secs()))??;

        if raw.trim().is_empty() {
            return Err(OracleError::EmptyResponse.into());
        }
        Ok(validate(&raw, candidates, hard_budget)?)
    }
}
