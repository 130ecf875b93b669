//! SQLite implementation of the EventRepository.
//!
//! Dates are stored in a fixed-width UTC form so that range comparisons can
//! be done on the text column. Service references live in `event_services`
//! and keep their insertion order through `position`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

use super::service_repository::{hydrate, ServiceRow, SERVICE_COLUMNS};
use super::{format_sortable, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BudgetCommit, Event, EventStats, EventSummary, Money, Service};
use crate::domain::ports::EventRepository;

const EVENT_COLUMNS: &str = "id, user_id, budget_cents, date, location, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_service_ids(&self, event_ids: &[String]) -> DomainResult<HashMap<String, Vec<Uuid>>> {
        let mut by_event: HashMap<String, Vec<Uuid>> = HashMap::new();
        if event_ids.is_empty() {
            return Ok(by_event);
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT event_id, service_id FROM event_services WHERE event_id IN (");
        let mut separated = qb.separated(", ");
        for id in event_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY event_id, position");

        let links: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;
        for (event_id, service_id) in links {
            by_event.entry(event_id).or_default().push(parse_uuid(&service_id)?);
        }
        Ok(by_event)
    }

    async fn into_events(&self, rows: Vec<EventRow>) -> DomainResult<Vec<Event>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut services = self.load_service_ids(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let service_ids = services.remove(&row.id).unwrap_or_default();
                row.into_event(service_ids)
            })
            .collect()
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: &Event) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO events (id, user_id, budget_cents, date, location, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(event.budget.cents())
        .bind(format_sortable(&event.date))
        .bind(&event.location)
        .bind(event.created_at.to_rfc3339())
        .bind(event.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::UserNotFound(event.user_id),
            other => other.into(),
        })?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.into_events(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update(&self, event: &Event) -> DomainResult<()> {
        let result = sqlx::query("UPDATE events SET budget_cents = ?, date = ?, location = ?, updated_at = ? WHERE id = ?")
            .bind(event.budget.cents())
            .bind(format_sortable(&event.date))
            .bind(&event.location)
            .bind(event.updated_at.to_rfc3339())
            .bind(event.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(id));
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE user_id = ? ORDER BY date ASC, rowid ASC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        self.into_events(rows).await
    }

    async fn delete_by_user(&self, user_id: Uuid) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM events WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> DomainResult<Vec<Event>> {
        let rows: Vec<EventRow> =
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, rowid ASC"))
                .fetch_all(&self.pool)
                .await?;

        self.into_events(rows).await
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM events").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_with_service_counts(&self, user_id: Uuid) -> DomainResult<Vec<EventSummary>> {
        let events = self.list_by_user(user_id).await?;
        Ok(events
            .into_iter()
            .map(|event| EventSummary {
                service_count: event.service_ids.len() as u64,
                event,
            })
            .collect())
    }

    async fn stats(&self, user_id: Uuid, day_start: DateTime<Utc>) -> DomainResult<EventStats> {
        let (total, upcoming): (i64, i64) = sqlx::query_as(
            r#"SELECT COUNT(*), COALESCE(SUM(CASE WHEN date >= ? THEN 1 ELSE 0 END), 0)
               FROM events WHERE user_id = ?"#,
        )
        .bind(format_sortable(&day_start))
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        let total = u64::try_from(total).unwrap_or_default();
        let upcoming = u64::try_from(upcoming).unwrap_or_default();
        Ok(EventStats {
            total,
            upcoming,
            old: total.saturating_sub(upcoming),
        })
    }

    async fn services_of(&self, event_id: Uuid) -> DomainResult<Vec<Service>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(&format!(
            r#"SELECT {SERVICE_COLUMNS} FROM event_services es
               JOIN services s ON s.id = es.service_id
               WHERE es.event_id = ?
               ORDER BY es.position"#
        ))
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        hydrate(&self.pool, rows).await
    }

    async fn commit_service(&self, event_id: Uuid, service_id: Uuid) -> DomainResult<BudgetCommit> {
        let mut tx = self.pool.begin().await?;

        // Writing first takes the database write lock, so the total read
        // below cannot go stale before the insert.
        let touched = sqlx::query("UPDATE events SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(event_id.to_string())
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event_id));
        }

        let budget_cents: i64 = sqlx::query_scalar("SELECT budget_cents FROM events WHERE id = ?")
            .bind(event_id.to_string())
            .fetch_one(&mut *tx)
            .await?;

        let price_cents: Option<i64> = sqlx::query_scalar("SELECT price_cents FROM services WHERE id = ?")
            .bind(service_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let price = Money::from_cents(price_cents.ok_or(DomainError::ServiceNotFound(service_id))?);

        let already: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM event_services WHERE event_id = ? AND service_id = ?")
                .bind(event_id.to_string())
                .bind(service_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        if already.is_some() {
            return Err(DomainError::DuplicateService { event_id, service_id });
        }

        let current_cents: i64 = sqlx::query_scalar(
            r#"SELECT COALESCE(SUM(s.price_cents), 0) FROM event_services es
               JOIN services s ON s.id = es.service_id
               WHERE es.event_id = ?"#,
        )
        .bind(event_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        let budget = Money::from_cents(budget_cents);
        let current_total = Money::from_cents(current_cents);
        if !current_total.fits_within(price, budget) {
            return Err(DomainError::OverBudget {
                budget,
                current_total,
                price,
            });
        }

        sqlx::query(
            r#"INSERT INTO event_services (event_id, service_id, position, added_at)
               VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM event_services WHERE event_id = ?), ?)"#,
        )
        .bind(event_id.to_string())
        .bind(service_id.to_string())
        .bind(event_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BudgetCommit::new(event_id, service_id, budget, current_total, price))
    }

    async fn remove_service(&self, event_id: Uuid, service_id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM event_services WHERE event_id = ? AND service_id = ?")
            .bind(event_id.to_string())
            .bind(service_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: String,
    user_id: String,
    budget_cents: i64,
    date: String,
    location: String,
    created_at: String,
    updated_at: String,
}

impl EventRow {
    fn into_event(self, service_ids: Vec<Uuid>) -> DomainResult<Event> {
        Ok(Event {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            budget: Money::from_cents(self.budget_cents),
            date: parse_datetime(&self.date)?,
            location: self.location,
            service_ids,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}
