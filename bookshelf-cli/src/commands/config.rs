//! Configuration inspection

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bookshelf_server::AppConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (password redacted)
    Show,
    /// Show default config file path
    Path,
}

pub fn run_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path().display());
            Ok(())
        }
    }
}

fn run_show(config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
