//! Catalog service CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_category_ids, resolve_service_id, resolve_vendor_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Money, Service, ServiceUpdate};
use crate::services::NewService;

#[derive(Args, Debug)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub command: ServiceCommands,
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// Add a service to the catalog
    Create {
        name: String,
        /// Price, e.g. 120 or 120.50
        #[arg(short, long)]
        price: Money,
        /// Vendor ID or unique prefix
        #[arg(long)]
        vendor: String,
        /// Image reference
        #[arg(long)]
        image: String,
        /// Category ID or prefix (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Service type (defaults to Standard)
        #[arg(long = "type")]
        service_type: Option<String>,
        /// Duration label (defaults to 2HR)
        #[arg(long)]
        duration: Option<String>,
    },
    /// List services
    List {
        /// Only services in any of these categories (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
    /// Show service details
    Show { id: String },
    /// Update a service
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<Money>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Replace the category links (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
    /// Remove a service from the catalog
    Delete { id: String },
    /// Remove every service from the catalog (admins only)
    DeleteAll,
}

#[derive(Debug, Serialize)]
pub struct ServiceOutput {
    pub service: Service,
}

impl CommandOutput for ServiceOutput {
    fn to_human(&self) -> String {
        let s = &self.service;
        let mut lines = vec![
            format!("Service: {}", s.name),
            format!("ID:       {}", s.id),
            format!("Price:    {}", s.price),
            format!("Type:     {}", s.service_type),
            format!("Duration: {}", s.duration),
            format!("Vendor:   {}", s.vendor_id),
        ];
        if let Some(desc) = &s.description {
            lines.push(format!("\nDescription:\n  {desc}"));
        }
        if !s.category_ids.is_empty() {
            lines.push("\nCategories:".to_string());
            for id in &s.category_ids {
                lines.push(format!("  - {id}"));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.service).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceListOutput {
    pub services: Vec<Service>,
    pub total: usize,
}

impl CommandOutput for ServiceListOutput {
    fn to_human(&self) -> String {
        if self.services.is_empty() {
            return "No services found.".to_string();
        }
        format!(
            "{}\nShowing {} service(s)",
            TableFormatter::new().format_services(&self.services),
            self.total
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ServiceArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let catalog = ctx.catalog();

    match args.command {
        ServiceCommands::Create {
            name,
            price,
            vendor,
            image,
            categories,
            description,
            service_type,
            duration,
        } => {
            let new = NewService {
                name,
                price,
                vendor_id: resolve_vendor_id(&ctx.pool, &vendor).await?,
                image,
                category_ids: resolve_category_ids(&ctx.pool, &categories).await?,
                description,
                service_type,
                duration,
            };
            let service = catalog.create_service(new).await?;
            output(&ServiceOutput { service }, json_mode);
        }
        ServiceCommands::List { categories } => {
            let category_ids = resolve_category_ids(&ctx.pool, &categories).await?;
            let services = catalog.list_services(category_ids).await?;
            let total = services.len();
            output(&ServiceListOutput { services, total }, json_mode);
        }
        ServiceCommands::Show { id } => {
            let id = resolve_service_id(&ctx.pool, &id).await?;
            let service = catalog.get_service(id).await?;
            output(&ServiceOutput { service }, json_mode);
        }
        ServiceCommands::Update {
            id,
            name,
            price,
            description,
            image,
            categories,
        } => {
            let id = resolve_service_id(&ctx.pool, &id).await?;
            let category_ids = if categories.is_empty() {
                None
            } else {
                Some(resolve_category_ids(&ctx.pool, &categories).await?)
            };
            let update = ServiceUpdate {
                name,
                price,
                description,
                image,
                category_ids,
            };
            let service = catalog.update_service(id, update).await?;
            output(&ServiceOutput { service }, json_mode);
        }
        ServiceCommands::DeleteAll => {
            let removed = catalog.delete_all_services(ctx.caller().await?).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "removed": removed }));
            } else {
                println!("Deleted {removed} service(s)");
            }
        }
        ServiceCommands::Delete { id } => {
            let id = resolve_service_id(&ctx.pool, &id).await?;
            catalog.delete_service(id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "service_id": id }));
            } else {
                println!("Service deleted: {id}");
            }
        }
    }

    Ok(())
}
