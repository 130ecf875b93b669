//! Implementation of the `planora init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_from_config;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_path: Option<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nConfiguration written to {CONFIG_DIR}/{CONFIG_FILE}"));
        }
        if let Some(path) = &self.database_path {
            lines.push(format!("Database initialized at {path}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };
    let planora_dir = target_path.join(CONFIG_DIR);

    if planora_dir.exists() && !args.force {
        let out = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_path: None,
        };
        output(&out, json_mode);
        return Ok(());
    }

    if args.force && planora_dir.exists() {
        fs::remove_dir_all(&planora_dir)
            .await
            .with_context(|| format!("Failed to remove existing {CONFIG_DIR} directory"))?;
    }
    fs::create_dir_all(&planora_dir)
        .await
        .with_context(|| format!("Failed to create {}", planora_dir.display()))?;

    // The written file keeps the relative default path so the project can move.
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize default configuration")?;
    fs::write(planora_dir.join(CONFIG_FILE), yaml)
        .await
        .context("Failed to write configuration file")?;

    let mut database = config.database.clone();
    database.path = target_path.join(&config.database.path).display().to_string();
    initialize_from_config(&database).await.context("Failed to initialize database")?;
    tracing::info!(path = %database.path, "database initialized");

    let out = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_path: Some(database.path),
    };
    output(&out, json_mode);
    Ok(())
}
