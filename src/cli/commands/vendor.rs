//! Vendor CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::id_resolver::{resolve_user_id, resolve_vendor_id};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Vendor, VendorUpdate};

#[derive(Args, Debug)]
pub struct VendorArgs {
    #[command(subcommand)]
    pub command: VendorCommands,
}

#[derive(Subcommand, Debug)]
pub enum VendorCommands {
    /// Register a vendor for an existing user
    Create {
        /// Business name, unique ignoring case and surrounding spaces
        name: String,
        /// Owning user ID or unique prefix
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long, default_value = "")]
        logo: String,
    },
    /// List vendors
    List,
    /// Show vendor details
    Show { id: String },
    /// Edit a vendor profile
    Update {
        id: String,
        /// New business name, still unique
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        logo: Option<String>,
    },
    /// Delete a vendor and its services
    Delete { id: String },
    /// Delete every vendor and its services (admins only)
    DeleteAll,
}

#[derive(Debug, Serialize)]
pub struct VendorOutput {
    pub vendor: Vendor,
}

impl CommandOutput for VendorOutput {
    fn to_human(&self) -> String {
        let v = &self.vendor;
        [
            format!("Vendor: {}", v.business_name),
            format!("ID:    {}", v.id),
            format!("Owner: {}", v.user_id),
            format!("Bio:   {}", v.bio),
            format!("Logo:  {}", v.logo),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.vendor).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct VendorListOutput {
    pub vendors: Vec<Vendor>,
}

impl CommandOutput for VendorListOutput {
    fn to_human(&self) -> String {
        if self.vendors.is_empty() {
            return "No vendors found.".to_string();
        }
        TableFormatter::new().format_vendors(&self.vendors)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: VendorArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let catalog = ctx.catalog();

    match args.command {
        VendorCommands::Create { name, user, bio, logo } => {
            let user_id = resolve_user_id(&ctx.pool, &user).await?;
            let vendor = catalog.create_vendor(user_id, &name, &bio, &logo).await?;
            output(&VendorOutput { vendor }, json_mode);
        }
        VendorCommands::List => {
            let vendors = catalog.list_vendors().await?;
            output(&VendorListOutput { vendors }, json_mode);
        }
        VendorCommands::Show { id } => {
            let id = resolve_vendor_id(&ctx.pool, &id).await?;
            let vendor = catalog.get_vendor(id).await?;
            output(&VendorOutput { vendor }, json_mode);
        }
        VendorCommands::Update { id, name, bio, logo } => {
            let id = resolve_vendor_id(&ctx.pool, &id).await?;
            let update = VendorUpdate {
                business_name: name,
                bio,
                logo,
            };
            let vendor = catalog.update_vendor(id, update).await?;
            output(&VendorOutput { vendor }, json_mode);
        }
        VendorCommands::DeleteAll => {
            let removed = catalog.delete_all_vendors(ctx.caller().await?).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "removed": removed }));
            } else {
                println!("Deleted {removed} vendor(s)");
            }
        }
        VendorCommands::Delete { id } => {
            let id = resolve_vendor_id(&ctx.pool, &id).await?;
            catalog.delete_vendor(id).await?;
            if json_mode {
                println!("{}", serde_json::json!({ "success": true, "vendor_id": id }));
            } else {
                println!("Vendor deleted: {id}");
            }
        }
    }

    Ok(())
}
