//! OpenAPI documentation

use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{authors, books, health, publishers, statistics, tags},
    models::{Author, Book, Publisher, Tag},
};

/// Paged book listing
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// 1-based page number
    pub current_page: u64,
    pub page_size: u64,
}

/// Paged author listing
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPage {
    pub authors: Vec<Author>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

/// Paged publisher listing
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublisherPage {
    pub publishers: Vec<Publisher>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OPL Catalog API",
        version = "1.0.0",
        description = "Library catalog REST API: books, authors, publishers and tags",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::get_book,
        books::list_books,
        books::filter_books,
        books::save_book,
        books::delete_book,
        // Authors
        authors::get_author,
        authors::list_authors,
        authors::filter_authors,
        authors::save_author,
        authors::delete_author,
        // Publishers
        publishers::get_publisher,
        publishers::list_publishers,
        publishers::filter_publishers,
        publishers::save_publisher,
        publishers::delete_publisher,
        // Tags
        tags::list_tags,
        tags::get_tag,
        tags::save_tag,
        tags::delete_tag,
        // Statistics
        statistics::books_total,
        statistics::authors_total,
        statistics::publishers_total,
    ),
    components(
        schemas(
            Book,
            Author,
            Publisher,
            Tag,
            BookPage,
            AuthorPage,
            PublisherPage,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Books with their authors, publisher and tags"),
        (name = "authors", description = "Authors"),
        (name = "publishers", description = "Publishers"),
        (name = "tags", description = "Tags"),
        (name = "statistics", description = "Catalog totals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
