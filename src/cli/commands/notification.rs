//! Notification CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_notification_id, resolve_user_id, resolve_vendor_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Notification, NotificationKind};

#[derive(Args, Debug)]
pub struct NotificationArgs {
    #[command(subcommand)]
    pub command: NotificationCommands,
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// Notify a user on behalf of one of your vendors
    Send {
        /// Vendor ID or unique prefix
        #[arg(long)]
        vendor: String,
        /// Recipient user ID or unique prefix
        #[arg(long)]
        to: String,
        title: String,
        message: String,
        /// info, warning, success or error
        #[arg(short, long, default_value = "info", value_parser = parse_kind)]
        kind: NotificationKind,
    },
    /// Your notifications, newest first
    List,
    /// What one of your vendors has sent
    Sent {
        /// Vendor ID or unique prefix
        vendor: String,
    },
    /// Mark one of your notifications read
    Read { id: String },
    /// Delete one of your notifications
    Delete { id: String },
}

fn parse_kind(s: &str) -> Result<NotificationKind, String> {
    NotificationKind::from_str(s).ok_or_else(|| format!("invalid notification kind: {s}"))
}

#[derive(Debug, Serialize)]
pub struct NotificationListOutput {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

impl NotificationListOutput {
    fn new(notifications: Vec<Notification>) -> Self {
        let unread = notifications.iter().filter(|n| !n.read).count();
        Self { notifications, unread }
    }
}

impl CommandOutput for NotificationListOutput {
    fn to_human(&self) -> String {
        if self.notifications.is_empty() {
            return "No notifications.".to_string();
        }
        format!(
            "{}\n{} unread",
            TableFormatter::new().format_notifications(&self.notifications),
            self.unread
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: NotificationArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.notifications();
    let caller = ctx.caller().await?;

    match args.command {
        NotificationCommands::Send {
            vendor,
            to,
            title,
            message,
            kind,
        } => {
            let vendor_id = resolve_vendor_id(&ctx.pool, &vendor).await?;
            let user_id = resolve_user_id(&ctx.pool, &to).await?;
            let sent = service.notify(caller, vendor_id, user_id, &title, &message, kind).await?;
            if json_mode {
                println!("{}", serde_json::to_string_pretty(&sent)?);
            } else {
                println!("Notification sent: {}", sent.id);
            }
        }
        NotificationCommands::List => {
            let notifications = service.list_mine(caller).await?;
            output(&NotificationListOutput::new(notifications), json_mode);
        }
        NotificationCommands::Sent { vendor } => {
            let vendor_id = resolve_vendor_id(&ctx.pool, &vendor).await?;
            let notifications = service.list_sent(caller, vendor_id).await?;
            output(&NotificationListOutput::new(notifications), json_mode);
        }
        NotificationCommands::Read { id } => {
            let id = resolve_notification_id(&ctx.pool, &id).await?;
            service.mark_read(caller, id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "notification_id": id }));
            } else {
                println!("Marked read: {id}");
            }
        }
        NotificationCommands::Delete { id } => {
            let id = resolve_notification_id(&ctx.pool, &id).await?;
            service.delete(caller, id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "notification_id": id }));
            } else {
                println!("Notification deleted: {id}");
            }
        }
    }

    Ok(())
}
