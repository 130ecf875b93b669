//! Planora CLI entry point.

use anyhow::Result;
use clap::Parser;

use planora::cli::commands;
use planora::cli::{handle_error, AppContext, Cli, Commands};
use planora::{Config, ConfigLoader, Logger};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };
    let _logger = match Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, json),
    };

    if let Err(err) = run(cli, config).await {
        handle_error(err, json);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let Cli {
        json,
        acting_user,
        command,
    } = cli;

    match command {
        Commands::Init(args) => commands::init::execute(args, json).await,
        Commands::User(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::user::execute(args, &ctx, json).await
        }
        Commands::Category(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::category::execute(args, &ctx, json).await
        }
        Commands::Vendor(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::vendor::execute(args, &ctx, json).await
        }
        Commands::Service(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::service::execute(args, &ctx, json).await
        }
        Commands::Event(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::event::execute(args, &ctx, json).await
        }
        Commands::Invite(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::invite::execute(args, &ctx, json).await
        }
        Commands::Template(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::template::execute(args, &ctx, json).await
        }
        Commands::GiftCard(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::gift_card::execute(args, &ctx, json).await
        }
        Commands::Notification(args) => {
            let ctx = AppContext::open(config, acting_user).await?;
            commands::notification::execute(args, &ctx, json).await
        }
    }
}
