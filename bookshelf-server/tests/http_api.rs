//! Router-level tests: requests go through the full axum stack against an
//! in-memory database.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::db::migrations;
use bookshelf_server::http::{build_router, AppState};
use bookshelf_server::Database;

async fn app() -> Router {
    let db = Database::in_memory().await.unwrap();
    migrations::run(db.pool()).await.unwrap();
    migrations::seed_genres(db.pool(), &["Fiction", "Drama", "Satire"])
        .await
        .unwrap();
    build_router(Arc::new(AppState::new(db)), false)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_owned());
    (response.status(), location)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> StatusCode {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

async fn seed_authors(app: &Router) {
    post_form(app, "/authors/new-add", "fullname=Ilya+Ilf").await;
    post_form(app, "/authors/new-add", "fullname=Yevgeny+Petrov").await;
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn author_lifecycle_redirects_to_list() {
    let app = app().await;

    let (status, location) = post_form(&app, "/authors/new-add", "fullname=Anton+Chekhov").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/authors"));

    let (status, authors) = get(&app, "/authors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors, json!([{"id": 1, "fullname": "Anton Chekhov"}]));

    let (status, _) = post_form(&app, "/authors/1/update", "fullname=A.+P.+Chekhov").await;
    assert_eq!(status, StatusCode::FOUND);
    let (_, authors) = get(&app, "/authors").await;
    assert_eq!(authors[0]["fullname"], "A. P. Chekhov");

    let (status, location) = post_form(&app, "/authors/1/remove", "").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/authors"));
    let (_, authors) = get(&app, "/authors").await;
    assert_eq!(authors, json!([]));
}

#[tokio::test]
async fn duplicate_author_is_conflict() {
    let app = app().await;
    seed_authors(&app).await;

    let (status, _) = post_form(&app, "/authors/new-add", "fullname=Ilya+Ilf").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_form(&app, "/authors/1/update", "fullname=Yevgeny+Petrov").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn json_bodies_are_accepted_and_unicode_is_returned_literally() {
    let app = app().await;
    let status = post_json(&app, "/authors/new-add", json!({"fullname": "Михаил Булгаков"})).await;
    assert_eq!(status, StatusCode::FOUND);

    let response = app
        .clone()
        .oneshot(Request::get("/authors").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Михаил Булгаков"));
}

#[tokio::test]
async fn book_creation_and_info() {
    let app = app().await;
    seed_authors(&app).await;

    let (status, location) = post_form(
        &app,
        "/books/new",
        "name=The+Twelve+Chairs&description=Novel&created_year=1928&author=Ilya+Ilf\
         &genres=satire%2C+fiction&coAuthor=Yevgeny+Petrov",
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/books"));

    let (status, books) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        books,
        json!([{
            "id": 1,
            "name": "The Twelve Chairs",
            "description": "Novel",
            "created_year": "1928",
            "author_id": 1
        }])
    );

    let (status, info) = get(&app, "/books/1/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["title"], "The Twelve Chairs");
    assert_eq!(info["main_author"], json!({"id": 1, "fullname": "Ilya Ilf"}));
    assert_eq!(info["co_author"], "Yevgeny Petrov");
    assert_eq!(info["genres"], json!(["Satire", "Fiction"]));

    let (_, by_author) = get(&app, "/authors/1/books").await;
    assert_eq!(by_author.as_array().unwrap().len(), 1);
    let (_, by_co_author) = get(&app, "/authors/2/books").await;
    assert_eq!(by_co_author, json!([]));
}

#[tokio::test]
async fn duplicate_book_is_conflict_and_unknown_genre_is_not_found() {
    let app = app().await;
    seed_authors(&app).await;

    let book = json!({
        "name": "Dup",
        "description": "",
        "created_year": "1930",
        "author": "Ilya Ilf",
        "genres": "Drama"
    });
    assert_eq!(post_json(&app, "/books/new", book.clone()).await, StatusCode::FOUND);
    assert_eq!(post_json(&app, "/books/new", book).await, StatusCode::CONFLICT);

    let unknown = json!({
        "name": "Other",
        "description": "",
        "created_year": "1930",
        "author": "Ilya Ilf",
        "genres": "Western"
    });
    assert_eq!(post_json(&app, "/books/new", unknown).await, StatusCode::NOT_FOUND);

    // The book row from the failed request stays behind.
    let (_, books) = get(&app, "/books").await;
    assert_eq!(books.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn genre_and_period_filters() {
    let app = app().await;
    seed_authors(&app).await;

    for (name, year, genres) in [("X", "1999", "Fiction,Drama"), ("Y", "2005", "Fiction")] {
        let book = json!({
            "name": name,
            "description": "",
            "created_year": year,
            "author": "Ilya Ilf",
            "genres": genres
        });
        assert_eq!(post_json(&app, "/books/new", book).await, StatusCode::FOUND);
    }

    let (status, both) = get(&app, "/books/genres/fiction+drama").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = both.as_array().unwrap().iter().map(|b| b["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["X"]);

    let (_, fiction) = get(&app, "/books/genres/Fiction").await;
    assert_eq!(fiction.as_array().unwrap().len(), 2);

    let (status, _) = get(&app, "/books/genres/Western").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, period) = get(&app, "/books/period/start=1990&end=2000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(period[0]["name"], "X");
    assert_eq!(period.as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/books/period/1990-2000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_updates_book_columns() {
    let app = app().await;
    seed_authors(&app).await;
    post_form(
        &app,
        "/books/new",
        "name=Draft&description=d&created_year=1927&author=Ilya+Ilf&genres=Drama",
    )
    .await;

    let (status, location) = post_form(
        &app,
        "/books/1/edit",
        "name=Final&description=d&created_year=1928&author=Yevgeny+Petrov&genres=Satire",
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("/books"));

    let (_, info) = get(&app, "/books/1/info").await;
    assert_eq!(info["title"], "Final");
    assert_eq!(info["main_author"]["fullname"], "Yevgeny Petrov");
    assert_eq!(info["genres"], json!(["Drama"]));
}

#[tokio::test]
async fn bad_ids_and_missing_books() {
    let app = app().await;

    let (status, body) = get(&app, "/books/abc/info").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = get(&app, "/books/99/info").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
