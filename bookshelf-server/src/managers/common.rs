//! Cross-entity writes and payload serialization
//!
//! `add_book` runs its statements one after another without a transaction:
//! if a later step fails, the book row stays behind. `add_book_atomic` is the
//! opt-in variant that rolls everything back instead.

use serde::Serialize;
use sqlx::SqliteConnection;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::managers::authors::find_author_id;
use crate::managers::books::{
    find_book_by_name, find_genre_id, insert_author_link, insert_book, insert_genre_link,
};
use crate::managers::{AuthorsManager, BooksManager};
use crate::models::{GenreName, NewBook};

const ADD_BOOK: &str = "failed to add new book";

/// Orchestrates writes spanning authors, books and genres
#[derive(Clone, Debug)]
pub struct CommonManager {
    db: Database,
    pub authors: AuthorsManager,
    pub books: BooksManager,
}

impl CommonManager {
    pub fn new(db: Database) -> Self {
        Self {
            authors: AuthorsManager::new(db.clone()),
            books: BooksManager::new(db.clone()),
            db,
        }
    }

    /// Encode as JSON, leaving non-ASCII characters unescaped.
    pub fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }

    /// Create a book with its author, co-author and genre links.
    ///
    /// A taken title fails with `Duplicate` before anything is written. Any
    /// later failure comes back as `CompositeWrite`, and whatever was already
    /// inserted is kept.
    pub async fn add_book(&self, book: &NewBook) -> Result<()> {
        if self.books.get_book_by_name(&book.name).await?.is_some() {
            return Err(Error::duplicate("book", &book.name));
        }

        let mut conn = self.db.acquire().await?;
        let book_id = write_book(&mut conn, book)
            .await
            .map_err(|e| Error::composite(ADD_BOOK, e))?;

        tracing::info!(book_id, name = %book.name, "book added");
        Ok(())
    }

    /// `add_book` inside a transaction: either every row lands or none does.
    pub async fn add_book_atomic(&self, book: &NewBook) -> Result<()> {
        let mut tx = self.db.begin().await?;

        if find_book_by_name(&mut *tx, &book.name).await?.is_some() {
            return Err(Error::duplicate("book", &book.name));
        }

        let book_id = write_book(&mut tx, book)
            .await
            .map_err(|e| Error::composite(ADD_BOOK, e))?;

        tx.commit()
            .await
            .map_err(Error::data_access("failed to commit new book"))?;

        tracing::info!(book_id, name = %book.name, "book added atomically");
        Ok(())
    }

    /// Overwrite a book's own columns.
    ///
    /// Genre and co-author links are not touched, so `book.genres` and
    /// `book.co_author` have no effect here.
    pub async fn update_book(&self, id: i64, book: &NewBook) -> Result<()> {
        let author_id = self.authors.get_author_id_by_name(&book.author).await?;

        let affected = sqlx::query(
            r#"
            UPDATE books
            SET name = ?, description = ?, created_year = ?, author_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.name)
        .bind(&book.description)
        .bind(&book.created_year)
        .bind(author_id)
        .bind(id)
        .execute(self.db.pool())
        .await
        .map_err(Error::data_access("failed to update book"))?
        .rows_affected();

        tracing::info!(id, author_id, updated = affected > 0, "book update requested");
        Ok(())
    }
}

/// Insert the book row, then its author and genre links. Returns the new id.
async fn write_book(conn: &mut SqliteConnection, book: &NewBook) -> Result<i64> {
    let author_id = find_author_id(&mut *conn, &book.author).await?;
    insert_book(&mut *conn, book, author_id).await?;

    // Titles are unique, so the name finds the row just inserted.
    let book_id = find_book_by_name(&mut *conn, &book.name)
        .await?
        .ok_or_else(|| Error::not_found("book", &book.name))?
        .id;

    let co_author_id = match book.co_author() {
        Some(name) => Some(find_author_id(&mut *conn, name).await?),
        None => None,
    };

    for linked_author in [Some(author_id), co_author_id].into_iter().flatten() {
        insert_author_link(&mut *conn, linked_author, book_id).await?;
    }

    for genre in &book.genres {
        let genre_id = find_genre_id(&mut *conn, &GenreName::new(genre)).await?;
        insert_genre_link(&mut *conn, genre_id, book_id).await?;
    }

    Ok(book_id)
}
