//! Planora - event planning with budget-aware service suggestions
//!
//! Users plan events with a fixed budget and pick services from a vendor
//! catalog. The suggestion engine asks a ranking oracle for a selection,
//! checks every reply against the catalog and the budget, and falls back to
//! a deterministic cheapest-first selection whenever the oracle cannot be
//! used. Adding a service to an event is an atomic, budget-checked commit.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, ports and errors
//! - **Service Layer** (`services`): suggestion engine and CRUD rules
//! - **Adapters** (`adapters`): `SQLite` repositories and ranking oracles
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    BudgetCommit, Caller, Config, Event, Money, SelectedItem, Selection, Service, Suggestion, SuggestionStrategy,
    User, UserRole,
};
pub use domain::ports::{EventRepository, OracleError, RankingOracle, RankingRequest, ServiceRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::Logger;
pub use services::{BudgetCap, EventService, SuggestionRequest, SuggestionService};
