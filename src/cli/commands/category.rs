//! Category CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::resolve_category_id;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::Category;

#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Create { name: String },
    /// List categories
    List,
    /// Rename a category
    Update {
        /// Category ID or unique prefix
        id: String,
        name: String,
    },
    /// Delete a category; services lose the link but stay in the catalog
    Delete {
        /// Category ID or unique prefix
        id: String,
    },
    /// Delete every category (admins only)
    DeleteAll,
}

#[derive(Debug, Serialize)]
pub struct CategoryListOutput {
    pub categories: Vec<Category>,
}

impl CommandOutput for CategoryListOutput {
    fn to_human(&self) -> String {
        if self.categories.is_empty() {
            return "No categories found.".to_string();
        }
        TableFormatter::new().format_categories(&self.categories)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryActionOutput {
    pub success: bool,
    pub category_id: String,
    pub message: String,
}

impl CommandOutput for CategoryActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CategoryArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let catalog = ctx.catalog();

    match args.command {
        CategoryCommands::Create { name } => {
            let category = catalog.create_category(&name).await?;
            let out = CategoryActionOutput {
                success: true,
                category_id: category.id.to_string(),
                message: format!("Category created: {} ({})", category.name, category.id),
            };
            output(&out, json_mode);
        }
        CategoryCommands::List => {
            let categories = catalog.list_categories().await?;
            output(&CategoryListOutput { categories }, json_mode);
        }
        CategoryCommands::Update { id, name } => {
            let id = resolve_category_id(&ctx.pool, &id).await?;
            let category = catalog.update_category(id, &name).await?;
            let out = CategoryActionOutput {
                success: true,
                category_id: id.to_string(),
                message: format!("Category renamed: {}", category.name),
            };
            output(&out, json_mode);
        }
        CategoryCommands::DeleteAll => {
            let removed = catalog.delete_all_categories(ctx.caller().await?).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "removed": removed }));
            } else {
                println!("Deleted {removed} categor{}", if removed == 1 { "y" } else { "ies" });
            }
        }
        CategoryCommands::Delete { id } => {
            let id = resolve_category_id(&ctx.pool, &id).await?;
            catalog.delete_category(id).await?;
            let out = CategoryActionOutput {
                success: true,
                category_id: id.to_string(),
                message: format!("Category deleted: {id}"),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
