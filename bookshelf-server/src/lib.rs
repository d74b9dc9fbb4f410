//! bookshelf-server: catalogue of authors, books and genres over HTTP
//!
//! Managers hold the data-access logic; the `http` module is a thin axum
//! shim mapping routes onto manager calls.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod managers;
pub mod models;

pub use config::{AppConfig, DatabaseConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use managers::{AuthorsManager, BooksManager, CommonManager};
