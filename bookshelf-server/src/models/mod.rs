//! Domain models
//!
//! Row types map straight from SQL through `FromRow` and serialize with the
//! column names as JSON keys.

pub mod author;
pub mod book;
pub mod genre;

pub use author::Author;
pub use book::{Book, BookInfo, NewBook};
pub use genre::GenreName;
