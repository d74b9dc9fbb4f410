//! Book manager
//!
//! Reads and composes books, genres and the two junction tables:
//! - `genres_of_book(book_id, genre_id)`
//! - `authors_of_book(book_id, author_id)`
//!
//! Junction inserts never deduplicate; linking twice stores two rows.

use std::collections::HashSet;

use sqlx::{SqliteConnection, SqliteExecutor};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::managers::authors::find_author;
use crate::models::{Author, Book, BookInfo, GenreName, NewBook};

const BOOK_COLUMNS: &str = "id, name, description, created_year, author_id";

/// CRUD and read composition over books, genres and their junctions
#[derive(Clone, Debug)]
pub struct BooksManager {
    db: Database,
}

impl BooksManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All books in insertion order.
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
            .fetch_all(self.db.pool())
            .await
            .map_err(Error::data_access("failed to list books"))
    }

    /// Books whose primary author is `author_id`. Co-authored books are not
    /// included.
    pub async fn list_books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ? ORDER BY id"
        ))
        .bind(author_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(Error::data_access("failed to list books of author"))
    }

    pub async fn genre_exists(&self, name: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM genres WHERE name = ?)")
            .bind(GenreName::new(name).as_str())
            .fetch_one(self.db.pool())
            .await
            .map_err(Error::data_access("failed to check genre"))
    }

    pub async fn get_genre_id_by_name(&self, name: &str) -> Result<i64> {
        find_genre_id(self.db.pool(), &GenreName::new(name)).await
    }

    pub async fn add_genre_association(&self, genre_id: i64, book_id: i64) -> Result<()> {
        insert_genre_link(self.db.pool(), genre_id, book_id).await?;
        tracing::info!(genre_id, book_id, "genre linked to book");
        Ok(())
    }

    pub async fn add_author_association(&self, author_id: i64, book_id: i64) -> Result<()> {
        insert_author_link(self.db.pool(), author_id, book_id).await?;
        tracing::info!(author_id, book_id, "author linked to book");
        Ok(())
    }

    /// Books linked to every one of `genres`.
    ///
    /// Starts from every book id in `genres_of_book` and intersects it with
    /// the ids linked to each requested genre, so an empty request returns
    /// every book linked to any genre. An unknown genre fails the whole call.
    /// Results follow the first appearance of each book in the junction.
    pub async fn get_books_by_genres<S: AsRef<str>>(&self, genres: &[S]) -> Result<Vec<Book>> {
        let mut conn = self.db.acquire().await?;

        let mut genre_ids = Vec::with_capacity(genres.len());
        for name in genres {
            genre_ids.push(find_genre_id(&mut *conn, &GenreName::new(name.as_ref())).await?);
        }

        let mut matched: Vec<i64> =
            sqlx::query_scalar::<_, i64>("SELECT book_id FROM genres_of_book ORDER BY rowid")
                .fetch_all(&mut *conn)
                .await
                .map_err(Error::data_access("failed to read genres_of_book"))?;

        for genre_id in genre_ids {
            let linked: HashSet<i64> =
                sqlx::query_scalar::<_, i64>("SELECT book_id FROM genres_of_book WHERE genre_id = ?")
                    .bind(genre_id)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(Error::data_access("failed to list books of genre"))?
                    .into_iter()
                    .collect();
            matched.retain(|id| linked.contains(id));
        }

        let mut seen = HashSet::new();
        matched.retain(|id| seen.insert(*id));

        let mut books = Vec::with_capacity(matched.len());
        for id in matched {
            books.push(find_book(&mut *conn, id).await?);
        }

        tracing::debug!(genres = genres.len(), found = books.len(), "books by genres");
        Ok(books)
    }

    /// Books with `start <= created_year <= end`, compared as text.
    ///
    /// Years are strings, so "19999" falls inside "1990".."2000" while "900"
    /// falls outside "800".."1000".
    pub async fn get_books_by_period(&self, start: &str, end: &str) -> Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE created_year BETWEEN ? AND ? ORDER BY id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await
        .map_err(Error::data_access("failed to list books for period"))
    }

    /// Exact-title lookup.
    pub async fn get_book_by_name(&self, name: &str) -> Result<Option<Book>> {
        find_book_by_name(self.db.pool(), name).await
    }

    pub async fn get_book(&self, id: i64) -> Result<Book> {
        find_book(self.db.pool(), id).await
    }

    /// Compose the denormalised view of one book.
    pub async fn get_book_info(&self, id: i64) -> Result<BookInfo> {
        let mut conn = self.db.acquire().await?;

        let book = find_book(&mut *conn, id).await?;
        let main_author = find_author(&mut *conn, book.author_id).await?;
        let co_author = find_co_author(&mut conn, book.id, book.author_id).await?;

        let genre_ids: Vec<i64> = sqlx::query_scalar::<_, i64>(
            "SELECT genre_id FROM genres_of_book WHERE book_id = ? ORDER BY rowid",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .map_err(Error::data_access("failed to list genres of book"))?;

        let mut genres = Vec::with_capacity(genre_ids.len());
        for genre_id in genre_ids {
            genres.push(find_genre_name(&mut *conn, genre_id).await?);
        }

        Ok(BookInfo {
            id: book.id,
            title: book.name,
            description: book.description,
            created_year: book.created_year,
            main_author,
            co_author: co_author.map(|author| author.fullname).unwrap_or_default(),
            genres,
        })
    }
}

/// First author linked to the book other than its primary author.
///
/// A link whose author row is gone fails with `NotFound`.
async fn find_co_author(
    conn: &mut SqliteConnection,
    book_id: i64,
    primary_author_id: i64,
) -> Result<Option<Author>> {
    let co_author_id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT author_id
        FROM authors_of_book
        WHERE book_id = ? AND author_id <> ?
        ORDER BY rowid
        LIMIT 1
        "#,
    )
    .bind(book_id)
    .bind(primary_author_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(Error::data_access("failed to look up co-author"))?;

    match co_author_id {
        Some(author_id) => Ok(Some(find_author(&mut *conn, author_id).await?)),
        None => Ok(None),
    }
}

async fn find_genre_name(conn: &mut SqliteConnection, genre_id: i64) -> Result<String> {
    sqlx::query_scalar::<_, String>("SELECT name FROM genres WHERE id = ?")
        .bind(genre_id)
        .fetch_optional(conn)
        .await
        .map_err(Error::data_access("failed to look up genre name"))?
        .ok_or_else(|| Error::not_found("genre", genre_id))
}

pub(crate) async fn find_genre_id<'e, E>(executor: E, genre: &GenreName) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT id FROM genres WHERE name = ?")
        .bind(genre.as_str())
        .fetch_optional(executor)
        .await
        .map_err(Error::data_access("failed to look up genre"))?
        .ok_or_else(|| Error::not_found("genre", genre))
}

pub(crate) async fn find_book<'e, E>(executor: E, id: i64) -> Result<Book>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Error::data_access("failed to look up book"))?
        .ok_or_else(|| Error::not_found("book", id))
}

pub(crate) async fn find_book_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Book>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Book>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE name = ? ORDER BY id LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(executor)
    .await
    .map_err(Error::data_access("failed to look up book by name"))
}

pub(crate) async fn insert_book<'e, E>(executor: E, book: &NewBook, author_id: i64) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO books (name, description, created_year, author_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&book.name)
    .bind(&book.description)
    .bind(&book.created_year)
    .bind(author_id)
    .execute(executor)
    .await
    .map_err(Error::data_access("failed to insert book"))?;
    Ok(())
}

pub(crate) async fn insert_genre_link<'e, E>(executor: E, genre_id: i64, book_id: i64) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO genres_of_book (book_id, genre_id) VALUES (?, ?)")
        .bind(book_id)
        .bind(genre_id)
        .execute(executor)
        .await
        .map_err(Error::data_access("failed to add row to genres_of_book"))?;
    Ok(())
}

pub(crate) async fn insert_author_link<'e, E>(executor: E, author_id: i64, book_id: i64) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO authors_of_book (book_id, author_id) VALUES (?, ?)")
        .bind(book_id)
        .bind(author_id)
        .execute(executor)
        .await
        .map_err(Error::data_access("failed to add row to authors_of_book"))?;
    Ok(())
}
