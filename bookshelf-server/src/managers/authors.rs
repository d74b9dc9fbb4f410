//! Author manager
//!
//! Names are checked for uniqueness before every insert or rename; the
//! table itself has no constraint.

use sqlx::SqliteExecutor;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Author;

/// CRUD over the `authors` table
#[derive(Clone, Debug)]
pub struct AuthorsManager {
    db: Database,
}

impl AuthorsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All authors in insertion order.
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        sqlx::query_as::<_, Author>("SELECT id, fullname FROM authors ORDER BY id")
            .fetch_all(self.db.pool())
            .await
            .map_err(Error::data_access("failed to list authors"))
    }

    /// Whether an author with exactly this fullname exists.
    pub async fn author_exists(&self, fullname: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM authors WHERE fullname = ?)")
            .bind(fullname)
            .fetch_one(self.db.pool())
            .await
            .map_err(Error::data_access("failed to check for existing author"))
    }

    /// Insert a new author, refusing a fullname that is already taken.
    pub async fn add_author(&self, fullname: &str) -> Result<Author> {
        if self.author_exists(fullname).await? {
            return Err(Error::duplicate("author", fullname));
        }

        let id = sqlx::query("INSERT INTO authors (fullname) VALUES (?)")
            .bind(fullname)
            .execute(self.db.pool())
            .await
            .map_err(Error::data_access("failed to add author"))?
            .last_insert_rowid();

        tracing::info!(id, fullname, "author added");
        Ok(Author {
            id,
            fullname: fullname.to_owned(),
        })
    }

    /// Delete by id, returning whether a row went away.
    ///
    /// Books and association rows pointing at the author are left in place.
    pub async fn remove_author(&self, id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(Error::data_access("failed to remove author"))?
            .rows_affected();

        tracing::info!(id, removed = affected > 0, "author remove requested");
        Ok(affected > 0)
    }

    /// Rename an author; fails if a different author already has the name.
    pub async fn update_author(&self, id: i64, fullname: &str) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE fullname = ? AND id <> ?)",
        )
        .bind(fullname)
        .bind(id)
        .fetch_one(self.db.pool())
        .await
        .map_err(Error::data_access("failed to check for existing author"))?;

        if taken {
            return Err(Error::duplicate("author", fullname));
        }

        let affected = sqlx::query("UPDATE authors SET fullname = ? WHERE id = ?")
            .bind(fullname)
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(Error::data_access("failed to update author"))?
            .rows_affected();

        tracing::info!(id, fullname, updated = affected > 0, "author rename requested");
        Ok(affected > 0)
    }

    /// Resolve a fullname to its id.
    pub async fn get_author_id_by_name(&self, fullname: &str) -> Result<i64> {
        let id = find_author_id(self.db.pool(), fullname).await?;
        tracing::debug!(id, fullname, "author resolved");
        Ok(id)
    }
}

pub(crate) async fn find_author_id<'e, E>(executor: E, fullname: &str) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT id FROM authors WHERE fullname = ? ORDER BY id LIMIT 1")
        .bind(fullname)
        .fetch_optional(executor)
        .await
        .map_err(Error::data_access("failed to look up author"))?
        .ok_or_else(|| Error::not_found("author", fullname))
}

pub(crate) async fn find_author<'e, E>(executor: E, id: i64) -> Result<Author>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Author>("SELECT id, fullname FROM authors WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(Error::data_access("failed to look up author"))?
        .ok_or_else(|| Error::not_found("author", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    async fn manager() -> AuthorsManager {
        let db = Database::in_memory().await.unwrap();
        migrations::run(db.pool()).await.unwrap();
        AuthorsManager::new(db)
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let authors = manager().await;
        authors.add_author("Mikhail Bulgakov").await.unwrap();
        authors.add_author("Anna Akhmatova").await.unwrap();

        let names: Vec<String> = authors
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.fullname)
            .collect();
        assert_eq!(names, vec!["Mikhail Bulgakov", "Anna Akhmatova"]);
    }

    #[tokio::test]
    async fn added_author_exists_and_cannot_be_added_twice() {
        let authors = manager().await;
        let added = authors.add_author("Fyodor Dostoevsky").await.unwrap();

        assert!(authors.author_exists("Fyodor Dostoevsky").await.unwrap());
        assert_eq!(
            authors.get_author_id_by_name("Fyodor Dostoevsky").await.unwrap(),
            added.id
        );

        let err = authors.add_author("Fyodor Dostoevsky").await.unwrap_err();
        assert!(matches!(err, Error::Duplicate { resource: "author", .. }));
        assert_eq!(authors.list_authors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exists_is_exact_match() {
        let authors = manager().await;
        authors.add_author("Anton Chekhov").await.unwrap();

        assert!(!authors.author_exists("anton chekhov").await.unwrap());
        assert!(!authors.author_exists("Anton").await.unwrap());
    }

    #[tokio::test]
    async fn remove_reports_whether_row_was_deleted() {
        let authors = manager().await;
        let author = authors.add_author("Ivan Turgenev").await.unwrap();

        assert!(authors.remove_author(author.id).await.unwrap());
        assert!(!authors.remove_author(author.id).await.unwrap());
        assert!(!authors.author_exists("Ivan Turgenev").await.unwrap());
    }

    #[tokio::test]
    async fn rename_to_taken_name_is_rejected_and_leaves_record() {
        let authors = manager().await;
        let gogol = authors.add_author("Nikolai Gogol").await.unwrap();
        authors.add_author("Alexander Pushkin").await.unwrap();

        let err = authors
            .update_author(gogol.id, "Alexander Pushkin")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));

        let list = authors.list_authors().await.unwrap();
        assert_eq!(list[0], gogol);
    }

    #[tokio::test]
    async fn rename_applies_and_keeping_own_name_is_allowed() {
        let authors = manager().await;
        let author = authors.add_author("Lev Tolstoy").await.unwrap();

        assert!(authors.update_author(author.id, "Leo Tolstoy").await.unwrap());
        assert!(authors.update_author(author.id, "Leo Tolstoy").await.unwrap());
        assert_eq!(
            authors.get_author_id_by_name("Leo Tolstoy").await.unwrap(),
            author.id
        );
        assert!(!authors.update_author(999, "Nobody").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let authors = manager().await;
        let err = authors.get_author_id_by_name("Nobody").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "author", .. }));
    }
}
