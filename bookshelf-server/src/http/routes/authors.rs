//! Author endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::{found, json_payload};
use crate::http::error::ApiError;
use crate::http::extractors::{FormOrJson, ValidId};
use crate::http::server::AppState;

/// Body of add and rename requests
#[derive(Deserialize)]
pub struct AuthorForm {
    pub fullname: String,
}

/// GET /authors - list all authors
async fn list_authors(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let authors = state.manager.authors.list_authors().await?;
    json_payload(&state, &authors)
}

/// POST /authors/new-add - add an author
async fn add_author(
    State(state): State<Arc<AppState>>,
    FormOrJson(form): FormOrJson<AuthorForm>,
) -> Result<Response, ApiError> {
    state.manager.authors.add_author(&form.fullname).await?;
    Ok(found("/authors"))
}

/// POST /authors/{id}/remove - delete an author
async fn remove_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Response, ApiError> {
    state.manager.authors.remove_author(id).await?;
    Ok(found("/authors"))
}

/// POST /authors/{id}/update - rename an author
async fn update_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    FormOrJson(form): FormOrJson<AuthorForm>,
) -> Result<Response, ApiError> {
    state.manager.authors.update_author(id, &form.fullname).await?;
    Ok(found("/authors"))
}

/// GET /authors/{id}/books - books by primary author
async fn list_author_books(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Response, ApiError> {
    let books = state.manager.books.list_books_by_author(id).await?;
    json_payload(&state, &books)
}

/// Author routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authors", get(list_authors))
        .route("/authors/new-add", post(add_author))
        .route("/authors/{id}/remove", post(remove_author))
        .route("/authors/{id}/update", post(update_author))
        .route("/authors/{id}/books", get(list_author_books))
}
