//! Books API endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::Book,
    pagination::PagedResponse,
    query::BookFilter,
};

use super::{
    extract::{JsonBody, Path, Query},
    PageParams,
};

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// List all books ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageParams),
    responses(
        (status = 200, description = "Page of books", body = super::openapi::BookPage),
        (status = 400, description = "Invalid page or size", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Book>>> {
    let books = &state.services.books;
    let (page, size) = params.resolve(0, books.paging());
    Ok(Json(books.list_all(page, size).await?))
}

/// Filter books.
///
/// Every supplied parameter narrows the result. Author parameters must all
/// hold for one and the same author. `publishedBefore` is an inclusive
/// lower bound on the publishing year and `publishedAfter` an inclusive
/// upper bound.
#[utoipa::path(
    get,
    path = "/books/filter",
    tag = "books",
    params(BookFilter, PageParams),
    responses(
        (status = 200, description = "Page of matching books", body = super::openapi::BookPage),
        (status = 400, description = "Invalid page or size", body = crate::error::ErrorResponse)
    )
)]
pub async fn filter_books(
    State(state): State<crate::AppState>,
    Query(filter): Query<BookFilter>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Book>>> {
    let books = &state.services.books;
    let (page, size) = params.resolve(1, books.paging());
    Ok(Json(books.filter(&filter, page, size).await?))
}

/// Save a new book or update an existing one
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book saved", body = Book),
        (status = 400, description = "Invalid book", body = crate::error::ErrorResponse),
        (status = 404, description = "Book to update not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_book(
    State(state): State<crate::AppState>,
    JsonBody(book): JsonBody<Book>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let saved = state.services.books.save_or_update(book).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.books.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
