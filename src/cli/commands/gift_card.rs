//! Gift card CLI commands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_event_id, resolve_gift_card_id, resolve_user_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{GiftCard, GiftCardStatus, GiftCardUpdate, Money};
use crate::services::NewGiftCard;

#[derive(Args, Debug)]
pub struct GiftCardArgs {
    #[command(subcommand)]
    pub command: GiftCardCommands,
}

#[derive(Subcommand, Debug)]
pub enum GiftCardCommands {
    /// Send a gift card to a couple
    Create {
        /// Sender email
        #[arg(long)]
        from: String,
        /// Couple email
        #[arg(long)]
        to: String,
        /// Amount, e.g. 100 or 99.50
        #[arg(short, long)]
        amount: Money,
        /// Event ID or unique prefix
        #[arg(short, long)]
        event: Option<String>,
        /// Expiry as RFC 3339, e.g. 2027-06-01T00:00:00Z
        #[arg(long)]
        expires: Option<DateTime<Utc>>,
    },
    /// List gift cards, newest first
    List {
        /// Only cards addressed to this couple (ID or prefix)
        #[arg(long)]
        couple: Option<String>,
    },
    /// Show gift card details
    Show { id: String },
    /// Edit a gift card
    Update {
        id: String,
        #[arg(short, long)]
        amount: Option<Money>,
        #[arg(short, long)]
        event: Option<String>,
        #[arg(long)]
        expires: Option<DateTime<Utc>>,
        /// active or expired
        #[arg(long, value_parser = parse_status)]
        status: Option<GiftCardStatus>,
    },
    /// Delete a gift card
    Delete { id: String },
}

fn parse_status(s: &str) -> Result<GiftCardStatus, String> {
    GiftCardStatus::from_str(s).ok_or_else(|| format!("invalid gift card status: {s}"))
}

#[derive(Debug, Serialize)]
pub struct GiftCardOutput {
    pub gift_card: GiftCard,
}

impl CommandOutput for GiftCardOutput {
    fn to_human(&self) -> String {
        let c = &self.gift_card;
        let mut lines = vec![
            format!("Gift card: {}", c.amount),
            format!("ID:     {}", c.id),
            format!("Status: {}", c.status.as_str()),
            format!("Sender: {}", c.sender_id),
            format!("Couple: {}", c.couple_id),
        ];
        if let Some(event_id) = c.event_id {
            lines.push(format!("Event:  {event_id}"));
        }
        if let Some(expires_at) = c.expires_at {
            lines.push(format!("Expires: {}", expires_at.format("%Y-%m-%d %H:%M")));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.gift_card).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct GiftCardListOutput {
    pub gift_cards: Vec<GiftCard>,
    pub total_amount: Money,
}

impl CommandOutput for GiftCardListOutput {
    fn to_human(&self) -> String {
        if self.gift_cards.is_empty() {
            return "No gift cards found.".to_string();
        }
        format!(
            "{}\nTotal: {}",
            TableFormatter::new().format_gift_cards(&self.gift_cards),
            self.total_amount
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: GiftCardArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.gift_cards();

    match args.command {
        GiftCardCommands::Create {
            from,
            to,
            amount,
            event,
            expires,
        } => {
            let event_id = match event {
                Some(prefix) => Some(resolve_event_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let gift_card = service
                .create_gift_card(NewGiftCard {
                    sender_email: from,
                    couple_email: to,
                    amount,
                    event_id,
                    expires_at: expires,
                })
                .await?;
            output(&GiftCardOutput { gift_card }, json_mode);
        }
        GiftCardCommands::List { couple } => {
            let gift_cards = match couple {
                Some(prefix) => {
                    let couple_id = resolve_user_id(&ctx.pool, &prefix).await?;
                    service.list_for_couple(couple_id).await?
                }
                None => service.list_gift_cards().await?,
            };
            let total_amount = gift_cards.iter().map(|c| c.amount).sum();
            output(&GiftCardListOutput { gift_cards, total_amount }, json_mode);
        }
        GiftCardCommands::Show { id } => {
            let id = resolve_gift_card_id(&ctx.pool, &id).await?;
            let gift_card = service.get_gift_card(id).await?;
            output(&GiftCardOutput { gift_card }, json_mode);
        }
        GiftCardCommands::Update {
            id,
            amount,
            event,
            expires,
            status,
        } => {
            let id = resolve_gift_card_id(&ctx.pool, &id).await?;
            let event_id = match event {
                Some(prefix) => Some(resolve_event_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let update = GiftCardUpdate {
                amount,
                event_id,
                expires_at: expires,
                status,
            };
            let gift_card = service.update_gift_card(id, update).await?;
            output(&GiftCardOutput { gift_card }, json_mode);
        }
        GiftCardCommands::Delete { id } => {
            let id = resolve_gift_card_id(&ctx.pool, &id).await?;
            service.delete_gift_card(id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "gift_card_id": id }));
            } else {
                println!("Gift card deleted: {id}");
            }
        }
    }

    Ok(())
}
