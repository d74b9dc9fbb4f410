//! HTTP server command

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use bookshelf_server::db::migrations;
use bookshelf_server::http::{run_server, ServerConfig};
use bookshelf_server::{AppConfig, Database};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config; default 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Skip schema creation on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = AppConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(dsn) = args.database_url {
        config.database.dsn = dsn;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }

    let db = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;

    if !args.no_migrate {
        migrations::run(db.pool())
            .await
            .context("Failed to run migrations")?;
    }

    tracing::info!("Starting bookshelf server on {}", config.server.bind);

    // Run server (blocks until shutdown)
    run_server(db, ServerConfig::from(config.server))
        .await
        .context("Server error")?;

    Ok(())
}
