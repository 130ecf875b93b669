//! Event CLI commands, including suggestions and budget-checked additions.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_category_ids, resolve_event_id, resolve_service_id};
use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::domain::models::{
    BudgetCommit, Event, EventServices, EventStats, EventSummary, EventUpdate, Money, Suggestion, SuggestionStrategy,
};
use crate::services::{BudgetCap, SuggestionRequest};

#[derive(Args, Debug)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventCommands,
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create an event
    Create {
        /// Total budget, e.g. 5000 or 5000.50
        #[arg(short, long)]
        budget: Money,
        /// Date as YYYY-MM-DD or RFC 3339
        #[arg(short, long, value_parser = parse_date)]
        date: DateTime<Utc>,
        #[arg(short, long)]
        location: String,
    },
    /// List your events, soonest first
    List {
        /// Every event on the platform (admins only)
        #[arg(long)]
        all: bool,
    },
    /// Show event details
    Show { id: String },
    /// Update an event
    Update {
        id: String,
        #[arg(short, long)]
        budget: Option<Money>,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Delete an event
    Delete { id: String },
    /// Delete all of your events
    DeleteAll {
        /// Delete every event on the platform (admins only)
        #[arg(long)]
        everyone: bool,
    },
    /// Count your upcoming and past events
    Stats,
    /// Show the services attached to an event with running totals
    Services { id: String },
    /// Suggest services that fit the event budget
    Suggest {
        id: String,
        /// Required category ID or prefix (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
        /// Use this ceiling instead of the event budget
        #[arg(short, long, conflicts_with = "unbounded")]
        budget: Option<Money>,
        /// Ignore the budget entirely
        #[arg(long)]
        unbounded: bool,
    },
    /// Attach a service, rejecting it if the budget would be exceeded
    AddService {
        /// Event ID or prefix
        id: String,
        /// Service ID or prefix
        service: String,
    },
    /// Detach a service from an event
    RemoveService { id: String, service: String },
}

/// Accept a bare date (midnight UTC) or a full RFC 3339 timestamp.
fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid date '{input}': expected YYYY-MM-DD or RFC 3339"))
}

#[derive(Debug, Serialize)]
pub struct EventOutput {
    pub event: Event,
}

impl CommandOutput for EventOutput {
    fn to_human(&self) -> String {
        let e = &self.event;
        [
            format!("Event: {}", e.id),
            format!("Date:     {}", e.date.format("%Y-%m-%d %H:%M")),
            format!("Location: {}", e.location),
            format!("Budget:   {}", e.budget),
            format!("Services: {}", e.service_ids.len()),
            format!("Updated:  {}", e.updated_at.format("%Y-%m-%d %H:%M:%S")),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.event).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct EventListOutput {
    pub events: Vec<EventSummary>,
    pub total: usize,
}

impl CommandOutput for EventListOutput {
    fn to_human(&self) -> String {
        if self.events.is_empty() {
            return "No events found.".to_string();
        }
        format!(
            "{}\nShowing {} event(s)",
            TableFormatter::new().format_events(&self.events),
            self.total
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct StatsOutput {
    #[serde(flatten)]
    pub stats: EventStats,
}

impl CommandOutput for StatsOutput {
    fn to_human(&self) -> String {
        format!(
            "Events:   {}\nUpcoming: {}\nPast:     {}",
            self.stats.total, self.stats.upcoming, self.stats.old
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.stats).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct EventServicesOutput {
    #[serde(flatten)]
    pub view: EventServices,
}

impl CommandOutput for EventServicesOutput {
    fn to_human(&self) -> String {
        let v = &self.view;
        let mut lines = Vec::new();
        if v.services.is_empty() {
            lines.push("No services attached.".to_string());
        } else {
            lines.push(TableFormatter::new().format_services(&v.services));
        }
        lines.push(format!("Total:     {}", v.total_price));
        lines.push(format!("Budget:    {}", v.budget));
        lines.push(format!("Remaining: {}", v.remaining));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.view).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionOutput {
    #[serde(flatten)]
    pub suggestion: Suggestion,
}

impl CommandOutput for SuggestionOutput {
    fn to_human(&self) -> String {
        let selection = self.suggestion.selection();
        let mut lines = vec![format!("Strategy: {}", self.suggestion.strategy().as_str())];
        match selection.budget {
            Some(budget) => lines.push(format!("Budget:   {budget}")),
            None => lines.push("Budget:   none".to_string()),
        }
        if selection.is_empty() {
            lines.push("\nNo services selected.".to_string());
        } else {
            lines.push(TableFormatter::new().format_selection(selection));
        }
        if let Some(rationale) = &selection.rationale {
            lines.push(format!("\n{rationale}"));
        }
        if let Some(notes) = &selection.notes {
            lines.push(format!("Notes: {notes}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.suggestion).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct CommitOutput {
    #[serde(flatten)]
    pub commit: BudgetCommit,
}

impl CommandOutput for CommitOutput {
    fn to_human(&self) -> String {
        let c = &self.commit;
        format!(
            "Service {} added to event {}\nTotal:     {} (+{})\nRemaining: {} of {}",
            c.service_id, c.event_id, c.new_total, c.added, c.remaining, c.budget
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.commit).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct EventActionOutput {
    pub success: bool,
    pub event_id: Option<String>,
    pub message: String,
}

impl CommandOutput for EventActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: EventArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let caller = ctx.caller().await?;
    let events = ctx.events();

    match args.command {
        EventCommands::Create { budget, date, location } => {
            let event = events.create_event(caller, budget, date, location).await?;
            output(&EventOutput { event }, json_mode);
        }
        EventCommands::List { all } => {
            let events = if all {
                events.list_all_events(caller).await?
            } else {
                events.list_with_service_counts(caller).await?
            };
            let total = events.len();
            output(&EventListOutput { events, total }, json_mode);
        }
        EventCommands::Show { id } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let event = events.get_event(caller, id).await?;
            output(&EventOutput { event }, json_mode);
        }
        EventCommands::Update {
            id,
            budget,
            date,
            location,
        } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let update = EventUpdate { budget, date, location };
            let event = events.update_event(caller, id, update).await?;
            output(&EventOutput { event }, json_mode);
        }
        EventCommands::Delete { id } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            events.delete_event(caller, id).await?;
            let out = EventActionOutput {
                success: true,
                event_id: Some(id.to_string()),
                message: format!("Event deleted: {id}"),
            };
            output(&out, json_mode);
        }
        EventCommands::DeleteAll { everyone } => {
            let removed = if everyone {
                events.delete_all_events(caller).await?
            } else {
                events.delete_my_events(caller).await?
            };
            let out = EventActionOutput {
                success: true,
                event_id: None,
                message: format!("Deleted {removed} event(s)"),
            };
            output(&out, json_mode);
        }
        EventCommands::Stats => {
            let stats = events.stats(caller).await?;
            output(&StatsOutput { stats }, json_mode);
        }
        EventCommands::Services { id } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let view = events.event_services(caller, id).await?;
            output(&EventServicesOutput { view }, json_mode);
        }
        EventCommands::Suggest {
            id,
            categories,
            budget,
            unbounded,
        } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let cap = match (budget, unbounded) {
                (_, true) => BudgetCap::Unbounded,
                (Some(amount), false) => BudgetCap::Fixed(amount),
                (None, false) => BudgetCap::EventBudget,
            };
            let request = SuggestionRequest::for_event(id)
                .with_categories(resolve_category_ids(&ctx.pool, &categories).await?)
                .with_budget(cap);

            let spinner = create_spinner("Ranking services...", json_mode);
            let suggestion = match ctx.suggestions().suggest(caller, request).await {
                Ok(suggestion) => suggestion,
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e.into());
                }
            };
            match suggestion.strategy() {
                SuggestionStrategy::Oracle => spinner.finish_success("Ranked by oracle"),
                SuggestionStrategy::Fallback => spinner.finish_warning("Cheapest-first fallback"),
            }
            output(&SuggestionOutput { suggestion }, json_mode);
        }
        EventCommands::AddService { id, service } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let service_id = resolve_service_id(&ctx.pool, &service).await?;
            let commit = events.commit_addition(caller, id, service_id).await?;
            output(&CommitOutput { commit }, json_mode);
        }
        EventCommands::RemoveService { id, service } => {
            let id = resolve_event_id(&ctx.pool, &id).await?;
            let service_id = resolve_service_id(&ctx.pool, &service).await?;
            events.remove_service(caller, id, service_id).await?;
            let out = EventActionOutput {
                success: true,
                event_id: Some(id.to_string()),
                message: format!("Service {service_id} removed from event {id}"),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(
            parse_date("2031-06-01").unwrap(),
            Utc.with_ymd_and_hms(2031, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2031-06-01T18:30:00+03:00").unwrap(),
            Utc.with_ymd_and_hms(2031, 6, 1, 15, 30, 0).unwrap()
        );
        assert!(parse_date("June 1st").is_err());
    }
}
