//! Event repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BudgetCommit, Event, EventStats, EventSummary, Service};

/// Repository interface for Event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event.
    async fn create(&self, event: &Event) -> DomainResult<()>;

    /// Get an event by ID, including its ordered service references.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Event>>;

    /// Update budget, date and location of an existing event.
    async fn update(&self, event: &Event) -> DomainResult<()>;

    /// Delete an event by ID.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// List events owned by a user, soonest first.
    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Event>>;

    /// Delete every event owned by a user. Returns the number removed.
    async fn delete_by_user(&self, user_id: Uuid) -> DomainResult<u64>;

    /// Every event, soonest first.
    async fn list_all(&self) -> DomainResult<Vec<Event>>;

    /// Delete every event. Returns the number removed.
    async fn delete_all(&self) -> DomainResult<u64>;

    /// List a user's events with their service counts.
    async fn list_with_service_counts(&self, user_id: Uuid) -> DomainResult<Vec<EventSummary>>;

    /// Count a user's events on either side of `day_start`.
    async fn stats(&self, user_id: Uuid, day_start: DateTime<Utc>) -> DomainResult<EventStats>;

    /// Services attached to an event, in insertion order, with catalog prices.
    async fn services_of(&self, event_id: Uuid) -> DomainResult<Vec<Service>>;

    /// Attach a service to an event if the new running total stays within
    /// the event budget.
    ///
    /// Reading the current total, checking it and writing the association
    /// happen as one atomic step against the stored event; two concurrent
    /// additions can never both pass the check against a stale total.
    /// Fails with `OverBudget`, `DuplicateService`, `EventNotFound` or
    /// `ServiceNotFound`.
    async fn commit_service(&self, event_id: Uuid, service_id: Uuid) -> DomainResult<BudgetCommit>;

    /// Detach a service from an event. Returns whether it was attached.
    async fn remove_service(&self, event_id: Uuid, service_id: Uuid) -> DomainResult<bool>;
}
