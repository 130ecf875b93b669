//! Event service implementing ownership rules and the budget-safe commit.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    BudgetCommit, Caller, Event, EventServices, EventStats, EventSummary, EventUpdate, Money, UserRole,
};
use crate::domain::ports::EventRepository;
use crate::services::require_admin;

pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create an event for the caller.
    pub async fn create_event(
        &self,
        caller: Caller,
        budget: Money,
        date: DateTime<Utc>,
        location: String,
    ) -> DomainResult<Event> {
        require_planner(caller)?;

        let event = Event::new(caller.user_id, budget, date, location);
        event.validate().map_err(DomainError::ValidationFailed)?;
        self.repository.create(&event).await?;

        info!(event_id = %event.id, budget = %event.budget, "event created");
        Ok(event)
    }

    /// Get one of the caller's events.
    pub async fn get_event(&self, caller: Caller, id: Uuid) -> DomainResult<Event> {
        require_planner(caller)?;
        self.owned_event(caller, id).await
    }

    /// List the caller's events, soonest first, with how many services each
    /// holds.
    pub async fn list_with_service_counts(&self, caller: Caller) -> DomainResult<Vec<EventSummary>> {
        require_planner(caller)?;
        self.repository.list_with_service_counts(caller.user_id).await
    }

    /// Apply a partial update. Lowering the budget does not revisit
    /// services already attached.
    pub async fn update_event(&self, caller: Caller, id: Uuid, update: EventUpdate) -> DomainResult<Event> {
        require_planner(caller)?;
        let mut event = self.owned_event(caller, id).await?;
        if update.is_empty() {
            return Ok(event);
        }

        update.apply(&mut event);
        event.validate().map_err(DomainError::ValidationFailed)?;
        self.repository.update(&event).await?;
        Ok(event)
    }

    pub async fn delete_event(&self, caller: Caller, id: Uuid) -> DomainResult<()> {
        if caller.role == UserRole::Vendor {
            return Err(DomainError::Forbidden("vendors cannot delete events".to_string()));
        }
        self.owned_event(caller, id).await?;
        self.repository.delete(id).await?;
        info!(event_id = %id, "event deleted");
        Ok(())
    }

    /// Delete every event the caller owns.
    pub async fn delete_my_events(&self, caller: Caller) -> DomainResult<u64> {
        require_planner(caller)?;
        let removed = self.repository.delete_by_user(caller.user_id).await?;
        info!(user_id = %caller.user_id, removed, "events deleted");
        Ok(removed)
    }

    /// Every event on the platform with its service count.
    pub async fn list_all_events(&self, caller: Caller) -> DomainResult<Vec<EventSummary>> {
        require_admin(caller, "list every event")?;
        let events = self.repository.list_all().await?;
        Ok(events
            .into_iter()
            .map(|event| EventSummary {
                service_count: event.service_ids.len() as u64,
                event,
            })
            .collect())
    }

    /// Delete every event on the platform.
    pub async fn delete_all_events(&self, caller: Caller) -> DomainResult<u64> {
        require_admin(caller, "delete every event")?;
        let removed = self.repository.delete_all().await?;
        info!(removed, "all events deleted");
        Ok(removed)
    }

    /// The event's services with running totals.
    pub async fn event_services(&self, caller: Caller, id: Uuid) -> DomainResult<EventServices> {
        let event = self.owned_event(caller, id).await?;
        let services = self.repository.services_of(id).await?;
        Ok(EventServices::new(&event, services))
    }

    /// Attach a service to one of the caller's events, rejecting it when the
    /// running total would exceed the event budget.
    #[instrument(skip(self), fields(user_id = %caller.user_id))]
    pub async fn commit_addition(&self, caller: Caller, event_id: Uuid, service_id: Uuid) -> DomainResult<BudgetCommit> {
        self.owned_event(caller, event_id).await?;

        match self.repository.commit_service(event_id, service_id).await {
            Ok(commit) => {
                info!(new_total = %commit.new_total, remaining = %commit.remaining, "service committed");
                Ok(commit)
            }
            Err(e @ DomainError::OverBudget { .. }) => {
                warn!(error = %e, "addition rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Detach a service from one of the caller's events.
    pub async fn remove_service(&self, caller: Caller, event_id: Uuid, service_id: Uuid) -> DomainResult<()> {
        self.owned_event(caller, event_id).await?;
        if !self.repository.remove_service(event_id, service_id).await? {
            return Err(DomainError::ServiceNotFound(service_id));
        }
        Ok(())
    }

    /// Counts of the caller's events relative to the start of today (UTC).
    pub async fn stats(&self, caller: Caller) -> DomainResult<EventStats> {
        self.stats_at(caller, Utc::now()).await
    }

    pub async fn stats_at(&self, caller: Caller, now: DateTime<Utc>) -> DomainResult<EventStats> {
        let day_start = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
        self.repository.stats(caller.user_id, day_start).await
    }

    async fn owned_event(&self, caller: Caller, id: Uuid) -> DomainResult<Event> {
        let event = self.repository.get(id).await?.ok_or(DomainError::EventNotFound(id))?;
        if !event.is_owned_by(caller.user_id) {
            return Err(DomainError::Forbidden(format!("event {id} does not belong to the caller")));
        }
        Ok(event)
    }
}

fn require_planner(caller: Caller) -> DomainResult<()> {
    if caller.role.can_plan_events() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "{} accounts cannot plan events",
            caller.role.as_str()
        )))
    }
}
