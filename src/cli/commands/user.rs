//! User CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::resolve_user_id;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{User, UserRole, UserUpdate};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Create {
        username: String,
        email: String,
        /// Role (admin, vendor, couple, normal)
        #[arg(short, long, default_value = "normal")]
        role: String,
        /// Profile image reference
        #[arg(long)]
        image: Option<String>,
    },
    /// List users
    List,
    /// Show user details
    Show {
        /// User ID or unique prefix
        id: String,
    },
    /// Edit an account (yourself, or anyone as an admin)
    Update {
        /// User ID or unique prefix
        id: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// New role; admins only
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete an account with its events and vendors
    Delete {
        /// User ID or unique prefix
        id: String,
    },
    /// Delete every non-admin account (admins only)
    DeleteAll,
}

#[derive(Debug, Serialize)]
pub struct UserOutput {
    pub user: User,
}

impl CommandOutput for UserOutput {
    fn to_human(&self) -> String {
        let u = &self.user;
        let mut lines = vec![
            format!("User: {}", u.username),
            format!("ID:    {}", u.id),
            format!("Email: {}", u.email),
            format!("Role:  {}", u.role.as_str()),
        ];
        if let Some(image) = &u.image {
            lines.push(format!("Image: {image}"));
        }
        lines.push(format!("Created: {}", u.created_at.format("%Y-%m-%d %H:%M:%S")));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.user).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct UserListOutput {
    pub users: Vec<User>,
    pub total: usize,
}

impl CommandOutput for UserListOutput {
    fn to_human(&self) -> String {
        if self.users.is_empty() {
            return "No users found.".to_string();
        }
        format!(
            "{}\nShowing {} user(s)",
            TableFormatter::new().format_users(&self.users),
            self.total
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: UserArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.users();

    match args.command {
        UserCommands::Create {
            username,
            email,
            role,
            image,
        } => {
            let role = UserRole::from_str(&role).ok_or_else(|| anyhow!("Invalid role: {role}"))?;
            let user = service.create_user(&username, &email, role, image).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::List => {
            let users = service.list_users().await?;
            let total = users.len();
            output(&UserListOutput { users, total }, json_mode);
        }
        UserCommands::Show { id } => {
            let id = resolve_user_id(&ctx.pool, &id).await?;
            let user = service.get_user(id).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::Update {
            id,
            username,
            email,
            role,
            image,
        } => {
            let role = role
                .map(|r| UserRole::from_str(&r).ok_or_else(|| anyhow!("Invalid role: {r}")))
                .transpose()?;
            let id = resolve_user_id(&ctx.pool, &id).await?;
            let update = UserUpdate {
                username,
                email,
                role,
                image,
            };
            let user = service.update_user(ctx.caller().await?, id, update).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::Delete { id } => {
            let id = resolve_user_id(&ctx.pool, &id).await?;
            service.delete_user(ctx.caller().await?, id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "user_id": id }));
            } else {
                println!("User deleted: {id}");
            }
        }
        UserCommands::DeleteAll => {
            let removed = service.delete_all_users(ctx.caller().await?).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "removed": removed }));
            } else {
                println!("Deleted {removed} user(s)");
            }
        }
    }

    Ok(())
}
