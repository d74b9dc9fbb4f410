//! Route handlers organized by resource

pub mod authors;
pub mod books;
pub mod health;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error::ApiError;
use super::server::AppState;

/// 200 response whose body comes from `CommonManager::serialize`.
pub(crate) fn json_payload<T: Serialize + ?Sized>(
    state: &AppState,
    data: &T,
) -> Result<Response, ApiError> {
    let body = state.manager.serialize(data)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

/// 302 redirect to `location`.
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
