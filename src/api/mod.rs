//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod books;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod publishers;
pub mod statistics;
pub mod tags;

use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::IntoParams;

use crate::{pagination::PagingConfig, AppState};

/// Paging query parameters shared by every paged endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number starting at 1; 0 also selects the first page
    pub page: Option<i64>,
    /// Number of records per page (default 25)
    pub size: Option<i64>,
}

impl PageParams {
    /// Page and size, falling back to `first_page` and the configured size
    pub fn resolve(&self, first_page: i64, paging: PagingConfig) -> (i64, i64) {
        (
            self.page.unwrap_or(first_page),
            self.size.unwrap_or(paging.default_page_size),
        )
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::save_book))
        .route("/books/filter", get(books::filter_books))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::save_author))
        .route("/authors/filter", get(authors::filter_authors))
        .route("/authors/:id", get(authors::get_author).delete(authors::delete_author))
        // Publishers
        .route("/publishers", get(publishers::list_publishers).post(publishers::save_publisher))
        .route("/publishers/filter", get(publishers::filter_publishers))
        .route("/publishers/:id", get(publishers::get_publisher).delete(publishers::delete_publisher))
        // Tags
        .route("/tags", get(tags::list_tags).post(tags::save_tag))
        .route("/tags/:id", get(tags::get_tag).delete(tags::delete_tag))
        // Statistics
        .route("/statistics/books-total", get(statistics::books_total))
        .route("/statistics/authors-total", get(statistics::authors_total))
        .route("/statistics/publishers-total", get(statistics::publishers_total))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
