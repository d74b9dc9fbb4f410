//! Error types for bookshelf-server
//!
//! Each variant is an error kind; the text it carries is data for humans,
//! callers branch on the variant.

use thiserror::Error;

/// Main error type for catalogue operations
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced entity is absent
    #[error("{resource} '{key}' not found")]
    NotFound { resource: &'static str, key: String },

    /// Uniqueness violation on a name
    #[error("{resource} '{key}' already exists")]
    Duplicate { resource: &'static str, key: String },

    /// Underlying storage operation failed
    #[error("{context}: {source}")]
    DataAccess {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A multi-step write failed part way through
    #[error("{operation} - {source}")]
    CompositeWrite {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Payload could not be encoded as JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for catalogue operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(resource: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    pub fn duplicate(resource: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            resource,
            key: key.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Wrap a failed step of a multi-statement write.
    pub fn composite(operation: &'static str, source: Error) -> Self {
        Self::CompositeWrite {
            operation,
            source: Box::new(source),
        }
    }

    /// Adapter for `map_err` on sqlx results.
    pub(crate) fn data_access(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::DataAccess { context, source }
    }

    /// The innermost error, looking through composite wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::CompositeWrite { source, .. } => source.root(),
            other => other,
        }
    }
}
