//! Command line interface for Planora.

pub mod commands;
pub mod context;
pub mod id_resolver;
pub mod output;

pub use context::AppContext;
pub use output::{create_spinner, CommandOutput, ProgressBarExt};

use clap::{Parser, Subcommand};
use console::style;

use crate::domain::errors::DomainError;

#[derive(Parser, Debug)]
#[command(name = "planora", version, about = "Event planning with budget-aware service suggestions")]
pub struct Cli {
    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Act as this user (ID or unique prefix)
    #[arg(long = "as", global = true, env = "PLANORA_USER")]
    pub acting_user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a Planora project in a directory
    Init(commands::init::InitArgs),
    /// Manage user accounts
    User(commands::user::UserArgs),
    /// Manage service categories
    Category(commands::category::CategoryArgs),
    /// Manage vendors
    Vendor(commands::vendor::VendorArgs),
    /// Manage the service catalog
    Service(commands::service::ServiceArgs),
    /// Plan events and get service suggestions
    Event(commands::event::EventArgs),
    /// Invite guests and record their answers
    Invite(commands::invite::InviteArgs),
    /// Manage invite card templates
    Template(commands::template::TemplateArgs),
    /// Send and manage gift cards
    #[command(name = "gift-card")]
    GiftCard(commands::gift_card::GiftCardArgs),
    /// Vendor-to-user notifications
    Notification(commands::notification::NotificationArgs),
}

/// Stable machine-readable error class for JSON output.
fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Forbidden(_)) => "forbidden",
        Some(DomainError::OverBudget { .. }) => "over_budget",
        Some(DomainError::DuplicateService { .. }) => "duplicate_service",
        Some(DomainError::DuplicateInvite { .. }) => "duplicate_invite",
        Some(DomainError::ValidationFailed(_)) => "validation_failed",
        Some(e) if e.is_not_found() => "not_found",
        Some(_) => "internal",
        None => "error",
    }
}

/// Report a failed command and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    tracing::debug!(error = ?err, "command failed");
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "kind": error_kind(&err),
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("Error:").red().bold());
    }
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Money;
    use clap::CommandFactory;
    use uuid::Uuid;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["planora", "event", "list", "--json", "--as", "ab12"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.acting_user.as_deref(), Some("ab12"));
    }

    #[test]
    fn test_suggest_budget_flags_conflict() {
        let result = Cli::try_parse_from(["planora", "event", "suggest", "ab12", "--budget", "10", "--unbounded"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_kinds() {
        let over = anyhow::Error::from(DomainError::OverBudget {
            budget: Money::from_units(1),
            current_total: Money::ZERO,
            price: Money::from_units(2),
        });
        assert_eq!(error_kind(&over), "over_budget");
        assert_eq!(
            error_kind(&anyhow::Error::from(DomainError::EventNotFound(Uuid::nil()))),
            "not_found"
        );
        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "error");
        assert_eq!(
            error_kind(&anyhow::Error::from(DomainError::DuplicateInvite {
                event_id: Uuid::nil(),
                guest_email: "a@example.com".to_string(),
            })),
            "duplicate_invite"
        );
        assert_eq!(
            error_kind(&anyhow::Error::from(DomainError::InviteTokenNotFound("x".to_string()))),
            "not_found"
        );
    }

    #[test]
    fn test_guest_rsvp_parses() {
        let cli = Cli::try_parse_from(["planora", "invite", "rsvp", "abc123", "yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Invite(commands::invite::InviteArgs {
                command: commands::invite::InviteCommands::Rsvp { .. }
            })
        ));
    }

    #[test]
    fn test_gift_card_flags() {
        let cli = Cli::try_parse_from([
            "planora",
            "gift-card",
            "create",
            "--from",
            "guest@example.com",
            "--to",
            "lina@example.com",
            "--amount",
            "99.50",
            "--expires",
            "2027-06-01T00:00:00Z",
        ])
        .unwrap();
        match cli.command {
            Commands::GiftCard(commands::gift_card::GiftCardArgs {
                command: commands::gift_card::GiftCardCommands::Create { amount, expires, .. },
            }) => {
                assert_eq!(amount, Money::from_cents(9_950));
                assert!(expires.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let bad_status = Cli::try_parse_from(["planora", "gift-card", "update", "ab12", "--status", "spent"]);
        assert!(bad_status.is_err());
    }

    #[test]
    fn test_bulk_delete_subcommands_parse() {
        for args in [
            ["planora", "user", "delete-all"],
            ["planora", "category", "delete-all"],
            ["planora", "service", "delete-all"],
            ["planora", "vendor", "delete-all"],
        ] {
            assert!(Cli::try_parse_from(args).is_ok(), "{args:?}");
        }
    }
}
