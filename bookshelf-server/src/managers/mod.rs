//! Data-access managers
//!
//! `CommonManager` owns one `AuthorsManager` and one `BooksManager`, all
//! sharing the same `Database` handle.

pub mod authors;
pub mod books;
pub mod common;

pub use authors::AuthorsManager;
pub use books::BooksManager;
pub use common::CommonManager;
