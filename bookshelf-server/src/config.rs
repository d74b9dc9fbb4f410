//! Process-wide configuration
//!
//! Loaded once at startup from `~/.bookshelf/config.toml` (or an explicit
//! path), then overridden by environment variables:
//! - `DATABASE_URL`: connection string
//! - `BOOKSHELF_DB_USER` / `BOOKSHELF_DB_PASSWORD`: credentials

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default connection string; `mode=rwc` creates the file on first start.
pub const DEFAULT_DSN: &str = "sqlite://books_shop.db?mode=rwc";

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind: SocketAddr,

    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
        }
    }
}

/// Connection settings for the catalogue database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub user: Option<String>,
    pub password: Option<String>,

    /// Driver options, applied as SQLite pragmas on connect
    pub options: BTreeMap<String, String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: DEFAULT_DSN.to_string(),
            user: None,
            password: None,
            options: BTreeMap::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn with_dsn(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Default config file path: ~/.bookshelf/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bookshelf/config.toml")
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `$BOOKSHELF_CONFIG` and then
    /// the default path are tried, falling back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = env::var("BOOKSHELF_CONFIG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| Self::config_path());
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid TOML in {}: {}", path.display(), e)))
    }

    /// Apply environment-style overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dsn) = lookup("DATABASE_URL") {
            self.database.dsn = dsn;
        }
        if let Some(user) = lookup("BOOKSHELF_DB_USER") {
            self.database.user = Some(user);
        }
        if let Some(password) = lookup("BOOKSHELF_DB_PASSWORD") {
            self.database.password = Some(password);
        }
    }

    /// Copy of the config that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.database.password.is_some() {
            copy.database.password = Some("********".to_string());
        }
        copy
    }
}
