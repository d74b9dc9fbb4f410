//! Book endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::{found, json_payload};
use crate::http::error::ApiError;
use crate::http::extractors::{FormOrJson, ValidId};
use crate::http::server::AppState;
use crate::models::{GenreName, NewBook};

/// Body of add and edit requests
#[derive(Deserialize)]
pub struct BookForm {
    pub name: String,
    pub description: String,
    pub created_year: String,
    pub author: String,
    /// Comma separated genre names
    pub genres: String,
    #[serde(rename = "coAuthor", default)]
    pub co_author: Option<String>,
}

impl From<BookForm> for NewBook {
    fn from(form: BookForm) -> Self {
        Self {
            name: form.name,
            description: form.description,
            created_year: form.created_year,
            author: form.author,
            genres: split_genres(&form.genres),
            co_author: form.co_author,
        }
    }
}

/// Split a comma separated genre list into trimmed, normalised names.
fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|genre| GenreName::new(genre.trim()).into_string())
        .collect()
}

/// Parse a `start=<year>&end=<year>` path segment.
fn parse_period(segment: &str) -> Option<(&str, &str)> {
    segment.strip_prefix("start=")?.split_once("&end=")
}

/// GET /books - list all books
async fn list_books(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let books = state.manager.books.list_books().await?;
    json_payload(&state, &books)
}

/// GET /books/genres/{genres} - books in every `+` separated genre
async fn books_by_genres(
    State(state): State<Arc<AppState>>,
    Path(genres): Path<String>,
) -> Result<Response, ApiError> {
    let genres: Vec<&str> = genres.split('+').collect();
    let books = state.manager.books.get_books_by_genres(&genres[..]).await?;
    json_payload(&state, &books)
}

/// GET /books/period/start={s}&end={e} - books written within the period
async fn books_by_period(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    let (start, end) = parse_period(&segment).ok_or_else(|| {
        ApiError::bad_request(format!("expected start=<year>&end=<year>, got '{}'", segment))
    })?;
    let books = state.manager.books.get_books_by_period(start, end).await?;
    json_payload(&state, &books)
}

/// GET /books/{id}/info - denormalised book view
async fn book_info(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Response, ApiError> {
    let info = state.manager.books.get_book_info(id).await?;
    json_payload(&state, &info)
}

/// POST /books/new - add a book with its links
async fn add_book(
    State(state): State<Arc<AppState>>,
    FormOrJson(form): FormOrJson<BookForm>,
) -> Result<Response, ApiError> {
    state.manager.add_book(&NewBook::from(form)).await?;
    Ok(found("/books"))
}

/// POST /books/{id}/edit - overwrite a book's columns
async fn edit_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    FormOrJson(form): FormOrJson<BookForm>,
) -> Result<Response, ApiError> {
    state.manager.update_book(id, &NewBook::from(form)).await?;
    Ok(found("/books"))
}

/// Book routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/new", post(add_book))
        .route("/books/genres/{genres}", get(books_by_genres))
        .route("/books/period/{period}", get(books_by_period))
        .route("/books/{id}/info", get(book_info))
        .route("/books/{id}/edit", post(edit_book))
}
