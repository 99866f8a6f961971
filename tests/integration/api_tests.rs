//! API integration tests driving the router over the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use opl_catalog::{
    api::create_router,
    pagination::PagingConfig,
    repository::MemoryStore,
    services::Services,
    AppConfig, AppState,
};

fn app() -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::in_memory(MemoryStore::new(), PagingConfig::default())),
    };
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri))
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Store a publisher, an author and a tag; returns their JSON bodies
async fn seed_references(app: &Router) -> (Value, Value, Value) {
    let (status, publisher) = send(app, "POST", "/publishers", Some(json!({"name": "Chilton"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, author) = send(
        app,
        "POST",
        "/authors",
        Some(json!({"firstname": "Frank", "lastname": "Herbert"})),
    )
    .await;
    let (_, tag) = send(app, "POST", "/tags", Some(json!({"name": "SciFi"}))).await;
    (publisher, author, tag)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();
    let (publisher, author, tag) = seed_references(&app).await;

    let (status, book) = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Dune",
            "publishingYear": 1965,
            "pageCount": 412,
            "isbn": "9780441013593",
            "authors": [author],
            "publisher": publisher,
            "tags": [tag],
            "shelf": "A",
            "ledge": "3"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = book["id"].as_i64().unwrap();
    assert_eq!(book["publisher"]["name"], "Chilton");
    assert_eq!(book["authors"][0]["lastname"], "Herbert");

    let (status, fetched) = send(&app, "GET", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, book);

    let (status, _) = send(&app, "DELETE", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Book with id {} not found", id));

    let (status, _) = send(&app, "GET", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_book_lists_every_violation() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "", "pageCount": 0, "isbn": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(errors.len(), 5);
    assert!(errors.contains(&"title: Must have at least 1 character"));
    assert!(errors.contains(&"authors: Must have at least 1 author"));
    assert!(errors.contains(&"pageCount: Must have a positive value"));
    assert!(errors.contains(&"isbn: Must have at least 9 characters"));
    assert!(errors.contains(&"publisher: May not be null"));

    let (_, total) = send(&app, "GET", "/statistics/books-total", None).await;
    assert_eq!(total, json!(0));
}

#[tokio::test]
async fn test_book_filter_and_paging() {
    let app = app();
    let (publisher, author, _) = seed_references(&app).await;

    for i in 0..15 {
        let (status, _) = send(
            &app,
            "POST",
            "/books",
            Some(json!({
                "title": format!("Volume {:02}", i),
                "publishingYear": 2000 + i,
                "authors": [author],
                "publisher": publisher
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, "GET", "/books?page=2&size=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["books"].as_array().unwrap().len(), 5);
    assert_eq!(page["totalElements"], 15);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["currentPage"], 2);
    assert_eq!(page["pageSize"], 10);

    let (_, first) = send(&app, "GET", "/books?page=0&size=10", None).await;
    let (_, also_first) = send(&app, "GET", "/books?page=1&size=10", None).await;
    assert_eq!(first, also_first);

    let (_, unfiltered) = send(&app, "GET", "/books/filter", None).await;
    assert_eq!(unfiltered["totalElements"], 15);
    assert_eq!(unfiltered["currentPage"], 1);

    let (_, range) = send(
        &app,
        "GET",
        "/books/filter?publishedBefore=2003&publishedAfter=2005&authorLName=Herbert",
        None,
    )
    .await;
    let titles: Vec<&str> = range["books"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Volume 03", "Volume 04", "Volume 05"]);

    let (_, none) = send(&app, "GET", "/books/filter?bookTitle=Nothing", None).await;
    assert_eq!(none["totalElements"], 0);
    assert_eq!(none["totalPages"], 0);
}

#[tokio::test]
async fn test_bad_paging_arguments() {
    let app = app();
    let (status, body) = send(&app, "GET", "/authors?page=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = send(&app, "GET", "/authors?size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/publishers?size=5000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_beyond_sql_offset_range() {
    let app = app();
    let (status, body) = send(&app, "GET", "/books?page=9223372036854775807&size=1000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = send(
        &app,
        "GET",
        "/books/filter?bookTitle=Dune&page=9223372036854775807&size=1000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparsable_arguments_are_bad_values() {
    let app = app();
    let (status, body) = send(&app, "GET", "/books/filter?publishedBefore=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(&app, "GET", "/authors/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(&app, "POST", "/publishers", Some(json!({"name": 42}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tags")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_whitespace_author_names_are_accepted() {
    let app = app();
    let (status, author) = send(
        &app,
        "POST",
        "/authors",
        Some(json!({"firstname": " ", "lastname": "Meyer"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(author["firstname"], " ");

    let (status, body) = send(
        &app,
        "POST",
        "/authors",
        Some(json!({"firstname": "", "lastname": "Meyer"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["firstname: Must have at least 1 character"]));
}

#[tokio::test]
async fn test_author_filter_keeps_names_apart() {
    let app = app();
    let (_, andrea) = send(
        &app,
        "POST",
        "/authors",
        Some(json!({"firstname": "Andrea", "lastname": "Meyer"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/authors",
        Some(json!({"firstname": "Andreas", "lastname": "Meyer"})),
    )
    .await;

    let (status, page) = send(&app, "GET", "/authors/filter?firstname=Andrea&lastname=Meyer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["authors"], json!([andrea]));

    let (_, listed) = send(&app, "GET", "/authors", None).await;
    assert_eq!(listed["totalElements"], 2);
    let (_, total) = send(&app, "GET", "/statistics/authors-total", None).await;
    assert_eq!(total, json!(2));
}

#[tokio::test]
async fn test_update_of_missing_record() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/publishers",
        Some(json!({"id": 99, "name": "Ghost Press"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Publisher with id 99 not found");
}

#[tokio::test]
async fn test_referenced_records_cannot_be_deleted() {
    let app = app();
    let (publisher, author, tag) = seed_references(&app).await;
    send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "Dune", "authors": [author], "publisher": publisher, "tags": [tag]})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/authors/{}", author["id"]), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "DELETE", &format!("/tags/{}", tag["id"]), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tags_are_listed_unpaged() {
    let app = app();
    for name in ["Fantasy", "Horror", "Poetry"] {
        let (status, _) = send(&app, "POST", "/tags", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(&app, "POST", "/tags", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, tags) = send(&app, "GET", "/tags", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = tags.as_array().unwrap().iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, vec!["Fantasy", "Horror", "Poetry"]);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/books/filter"].is_object());
}
