//! Invite CLI commands.
//!
//! `open` and `rsvp` are the guest side and take the invite token instead of
//! an acting user.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_event_id, resolve_invite_id, resolve_template_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Invite, InviteUpdate, RsvpStatus};

#[derive(Args, Debug)]
pub struct InviteArgs {
    #[command(subcommand)]
    pub command: InviteCommands,
}

#[derive(Subcommand, Debug)]
pub enum InviteCommands {
    /// Invite a guest to one of your events
    Create {
        /// Event ID or unique prefix
        event: String,
        /// Guest name
        name: String,
        /// Guest email, invited once per event
        email: String,
        /// Template ID or prefix; defaults to the oldest template
        #[arg(short, long)]
        template: Option<String>,
    },
    /// List invites for an event, or every invite as an admin
    List {
        /// Event ID or unique prefix
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Show invite details
    Show { id: String },
    /// Edit an invite
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// RSVP status (pending, attending, not_attending)
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Delete an invite
    Delete { id: String },
    /// Look up an invite by its guest token
    Open { token: String },
    /// Answer an invite by its guest token
    Rsvp {
        token: String,
        /// attending or not_attending (yes/no accepted)
        status: String,
    },
}

#[derive(Debug, Serialize)]
pub struct InviteOutput {
    pub invite: Invite,
}

impl CommandOutput for InviteOutput {
    fn to_human(&self) -> String {
        let i = &self.invite;
        let mut lines = vec![
            format!("Invite: {} <{}>", i.guest_name, i.guest_email),
            format!("ID:     {}", i.id),
            format!("Event:  {}", i.event_id),
            format!("RSVP:   {}", i.rsvp_status.as_str()),
            format!("Token:  {}", i.token),
        ];
        if let Some(template_id) = i.template_id {
            lines.push(format!("Template: {template_id}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.invite).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct InviteListOutput {
    pub invites: Vec<Invite>,
    pub attending: usize,
    pub not_attending: usize,
    pub pending: usize,
}

impl InviteListOutput {
    fn new(invites: Vec<Invite>) -> Self {
        let count = |status| invites.iter().filter(|i| i.rsvp_status == status).count();
        Self {
            attending: count(RsvpStatus::Attending),
            not_attending: count(RsvpStatus::NotAttending),
            pending: count(RsvpStatus::Pending),
            invites,
        }
    }
}

impl CommandOutput for InviteListOutput {
    fn to_human(&self) -> String {
        if self.invites.is_empty() {
            return "No invites found.".to_string();
        }
        format!(
            "{}\n{} attending, {} not attending, {} pending",
            TableFormatter::new().format_invites(&self.invites),
            self.attending,
            self.not_attending,
            self.pending
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn parse_status(status: &str) -> Result<RsvpStatus> {
    RsvpStatus::from_str(status).ok_or_else(|| anyhow!("Invalid RSVP status: {status}"))
}

pub async fn execute(args: InviteArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.invites();

    match args.command {
        InviteCommands::Create {
            event,
            name,
            email,
            template,
        } => {
            let event_id = resolve_event_id(&ctx.pool, &event).await?;
            let template_id = match template {
                Some(prefix) => Some(resolve_template_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let invite = service
                .create_invite(ctx.caller().await?, event_id, &name, &email, template_id)
                .await?;
            output(&InviteOutput { invite }, json_mode);
        }
        InviteCommands::List { event } => {
            let caller = ctx.caller().await?;
            let invites = match event {
                Some(prefix) => {
                    let event_id = resolve_event_id(&ctx.pool, &prefix).await?;
                    service.list_event_invites(caller, event_id).await?
                }
                None => service.list_invites(caller).await?,
            };
            output(&InviteListOutput::new(invites), json_mode);
        }
        InviteCommands::Show { id } => {
            let id = resolve_invite_id(&ctx.pool, &id).await?;
            let invite = service.get_invite(ctx.caller().await?, id).await?;
            output(&InviteOutput { invite }, json_mode);
        }
        InviteCommands::Update {
            id,
            name,
            email,
            status,
            template,
        } => {
            let id = resolve_invite_id(&ctx.pool, &id).await?;
            let template_id = match template {
                Some(prefix) => Some(resolve_template_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let update = InviteUpdate {
                guest_name: name,
                guest_email: email,
                rsvp_status: status.as_deref().map(parse_status).transpose()?,
                template_id,
            };
            let invite = service.update_invite(ctx.caller().await?, id, update).await?;
            output(&InviteOutput { invite }, json_mode);
        }
        InviteCommands::Delete { id } => {
            let id = resolve_invite_id(&ctx.pool, &id).await?;
            service.delete_invite(ctx.caller().await?, id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "invite_id": id }));
            } else {
                println!("Invite deleted: {id}");
            }
        }
        InviteCommands::Open { token } => {
            let invite = service.invite_by_token(&token).await?;
            output(&InviteOutput { invite }, json_mode);
        }
        InviteCommands::Rsvp { token, status } => {
            let invite = service.respond(&token, parse_status(&status)?).await?;
            output(&InviteOutput { invite }, json_mode);
        }
    }

    Ok(())
}
