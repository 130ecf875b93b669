//! Invite template CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_event_id, resolve_template_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{InviteTemplate, InviteTemplateUpdate};
use crate::services::NewInviteTemplate;

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommands,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Add an invite card design
    Create {
        /// Background image reference
        background: String,
        /// Event ID or unique prefix the design was made for
        #[arg(short, long)]
        event: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List templates, oldest first
    List,
    /// Show template details
    Show { id: String },
    /// Edit a template
    Update {
        id: String,
        #[arg(long)]
        background: Option<String>,
        #[arg(short, long)]
        event: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        /// Replace the tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a template; invites using it keep no template
    Delete { id: String },
}

#[derive(Debug, Serialize)]
pub struct TemplateOutput {
    pub template: InviteTemplate,
}

impl CommandOutput for TemplateOutput {
    fn to_human(&self) -> String {
        let t = &self.template;
        let mut lines = vec![
            format!("Template: {}", t.title.as_deref().unwrap_or("(untitled)")),
            format!("ID:         {}", t.id),
            format!("Background: {}", t.background),
        ];
        if let Some(subtitle) = &t.subtitle {
            lines.push(format!("Subtitle:   {subtitle}"));
        }
        if let Some(event_id) = t.event_id {
            lines.push(format!("Event:      {event_id}"));
        }
        if !t.tags.is_empty() {
            lines.push(format!("Tags:       {}", t.tags.join(", ")));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.template).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateListOutput {
    pub templates: Vec<InviteTemplate>,
}

impl CommandOutput for TemplateListOutput {
    fn to_human(&self) -> String {
        if self.templates.is_empty() {
            return "No invite templates found.".to_string();
        }
        TableFormatter::new().format_templates(&self.templates)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: TemplateArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.invites();

    match args.command {
        TemplateCommands::Create {
            background,
            event,
            title,
            subtitle,
            tags,
        } => {
            let event_id = match event {
                Some(prefix) => Some(resolve_event_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let template = service
                .create_template(NewInviteTemplate {
                    background,
                    event_id,
                    title,
                    subtitle,
                    tags,
                })
                .await?;
            output(&TemplateOutput { template }, json_mode);
        }
        TemplateCommands::List => {
            let templates = service.list_templates().await?;
            output(&TemplateListOutput { templates }, json_mode);
        }
        TemplateCommands::Show { id } => {
            let id = resolve_template_id(&ctx.pool, &id).await?;
            let template = service.get_template(id).await?;
            output(&TemplateOutput { template }, json_mode);
        }
        TemplateCommands::Update {
            id,
            background,
            event,
            title,
            subtitle,
            tags,
        } => {
            let id = resolve_template_id(&ctx.pool, &id).await?;
            let event_id = match event {
                Some(prefix) => Some(resolve_event_id(&ctx.pool, &prefix).await?),
                None => None,
            };
            let update = InviteTemplateUpdate {
                background,
                event_id,
                title,
                subtitle,
                tags: (!tags.is_empty()).then_some(tags),
            };
            let template = service.update_template(id, update).await?;
            output(&TemplateOutput { template }, json_mode);
        }
        TemplateCommands::Delete { id } => {
            let id = resolve_template_id(&ctx.pool, &id).await?;
            service.delete_template(id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "template_id": id }));
            } else {
                println!("Template deleted: {id}");
            }
        }
    }

    Ok(())
}
