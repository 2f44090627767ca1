use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backup;
mod cli;
mod config;
mod database;
mod notify;
mod server;
mod tracker;

use backup::BackupJob;
use cli::{Cli, Commands};
use config::{BackupConfig, ServerConfig};
use server::Server;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Setup tracing subscriber
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("issuedesk=info,tower_http=debug"))
                .unwrap(),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            address,
            port,
            database_url,
            migrations_path,
            default_owner_id,
            notify_webhook_url,
        } => {
            let config = ServerConfig {
                address,
                port,
                database_url,
                migrations_path,
                default_owner_id,
                notify_webhook_url,
            };
            Server::new(&config).await?.start().await?;
        }
        Commands::Backup {
            database_url,
            backup_dir,
            storage_url,
        } => {
            let config = BackupConfig {
                database_url,
                backup_dir,
                storage_url,
            };
            config.validate()?;
            BackupJob::new(config).run().await?;
        }
    }

    Ok(())
}
