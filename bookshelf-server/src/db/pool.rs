//! Connection provider
//!
//! Uses sqlx SqlitePool limited to one connection, opened explicitly at
//! startup and closed explicitly at shutdown.

use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// The single shared database handle.
const MAX_CONNECTIONS: u32 = 1;

/// Shared handle to the catalogue database
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database described by `config`.
    ///
    /// Driver options are applied as pragmas. Credentials have no meaning
    /// for SQLite and are only acknowledged in the log.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect(&DatabaseConfig::with_dsn("sqlite://books.db")).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.dsn)
            .map_err(Error::data_access("invalid database connection string"))?;

        for (key, value) in &config.options {
            options = options.pragma(key.clone(), value.clone());
        }

        if config.user.is_some() || config.password.is_some() {
            tracing::debug!("sqlite driver ignores user/password settings");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            // An in-memory database lives only as long as its connection.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(Error::data_access("failed to connect to database"))?;

        tracing::info!(dsn = %config.dsn, "database connection opened");
        Ok(Self { pool })
    }

    /// Fresh private in-memory database (for testing)
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig::with_dsn("sqlite::memory:")).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check out the connection for a sequence of statements.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(Error::data_access("failed to acquire database connection"))
    }

    /// Start a transaction; it rolls back unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(Error::data_access("failed to start transaction"))
    }

    /// Close the handle, waiting for the connection to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database connection closed");
    }
}
