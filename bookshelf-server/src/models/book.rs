use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Author;

/// Book record from database
///
/// `author_id` is the primary author; co-authors live only in
/// `authors_of_book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_year: String,
    pub author_id: i64,
}

/// Denormalised view of one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_year: String,
    pub main_author: Author,
    /// Empty when the book has no co-author
    pub co_author: String,
    pub genres: Vec<String>,
}

/// Fields supplied when adding or editing a book
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub name: String,
    pub description: String,
    pub created_year: String,
    /// Primary author's fullname
    pub author: String,
    pub genres: Vec<String>,
    pub co_author: Option<String>,
}

impl NewBook {
    /// Co-author name, treating an empty string as absent.
    pub fn co_author(&self) -> Option<&str> {
        self.co_author.as_deref().filter(|name| !name.is_empty())
    }
}
