//! Schema bootstrap for the catalogue tables
//!
//! No foreign keys and no uniqueness constraints on author or book names:
//! the managers check names before inserting and tolerate dangling ids.

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::GenreName;

/// Genres seeded by `bookshelf migrate`
pub const DEFAULT_GENRES: &[&str] = &[
    "Fiction",
    "Drama",
    "Fantasy",
    "Detective",
    "Romance",
    "Poetry",
    "Horror",
    "Adventure",
    "History",
    "Science",
];

/// Create all catalogue tables if they do not exist
pub async fn run(pool: &SqlitePool) -> Result<()> {
    tracing::info!("running catalogue migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fullname TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::data_access("failed to create authors table"))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            created_year TEXT NOT NULL,
            author_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::data_access("failed to create books table"))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::data_access("failed to create genres table"))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres_of_book (
            book_id INTEGER NOT NULL,
            genre_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::data_access("failed to create genres_of_book table"))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors_of_book (
            book_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(Error::data_access("failed to create authors_of_book table"))?;

    create_indexes(pool).await?;

    tracing::info!("catalogue migrations complete");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id)")
        .execute(pool)
        .await
        .map_err(Error::data_access("failed to create books index"))?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_genres_of_book_genre ON genres_of_book(genre_id)")
        .execute(pool)
        .await
        .map_err(Error::data_access("failed to create genres_of_book index"))?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_authors_of_book_book ON authors_of_book(book_id)")
        .execute(pool)
        .await
        .map_err(Error::data_access("failed to create authors_of_book index"))?;
    Ok(())
}

/// Insert genres, normalising names; existing names are left alone.
pub async fn seed_genres<S: AsRef<str>>(pool: &SqlitePool, names: &[S]) -> Result<u64> {
    let mut inserted = 0;
    for name in names {
        let genre = GenreName::new(name.as_ref());
        inserted += sqlx::query("INSERT OR IGNORE INTO genres (name) VALUES (?)")
            .bind(genre.as_str())
            .execute(pool)
            .await
            .map_err(Error::data_access("failed to seed genres"))?
            .rows_affected();
    }

    tracing::info!(inserted, "genres seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        run(db.pool()).await.unwrap();
        run(db.pool()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec!["authors", "authors_of_book", "books", "genres", "genres_of_book"]
        );
    }

    #[tokio::test]
    async fn seeding_normalises_and_skips_existing() {
        let db = Database::in_memory().await.unwrap();
        run(db.pool()).await.unwrap();

        assert_eq!(seed_genres(db.pool(), &["fICTION", "drama"]).await.unwrap(), 2);
        assert_eq!(seed_genres(db.pool(), &["Fiction"]).await.unwrap(), 0);

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM genres ORDER BY id")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(names, vec!["Fiction", "Drama"]);
    }
}
