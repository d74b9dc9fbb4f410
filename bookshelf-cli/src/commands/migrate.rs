//! Schema creation and genre seeding

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use bookshelf_server::db::migrations::{self, DEFAULT_GENRES};
use bookshelf_server::{AppConfig, Database};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Create tables only, without seeding genres
    #[arg(long)]
    pub no_seed: bool,
}

pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = AppConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(dsn) = args.database_url {
        config.database.dsn = dsn;
    }

    let db = Database::connect(&config.database)
        .await
        .context("Failed to open database")?;

    migrations::run(db.pool())
        .await
        .context("Failed to run migrations")?;

    if !args.no_seed {
        let added = migrations::seed_genres(db.pool(), DEFAULT_GENRES)
            .await
            .context("Failed to seed genres")?;
        println!("Seeded {} new genre(s)", added);
    }

    db.close().await;
    println!("Database ready: {}", config.database.dsn);
    Ok(())
}
