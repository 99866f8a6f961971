//! Authors API endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::Author,
    pagination::PagedResponse,
    query::AuthorFilter,
};

use super::{
    extract::{JsonBody, Path, Query},
    PageParams,
};

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// List all authors ordered by last name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageParams),
    responses(
        (status = 200, description = "Page of authors", body = super::openapi::AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Author>>> {
    let authors = &state.services.authors;
    let (page, size) = params.resolve(0, authors.paging());
    Ok(Json(authors.list_all(page, size).await?))
}

/// Filter authors by name patterns
#[utoipa::path(
    get,
    path = "/authors/filter",
    tag = "authors",
    params(AuthorFilter, PageParams),
    responses(
        (status = 200, description = "Page of matching authors", body = super::openapi::AuthorPage)
    )
)]
pub async fn filter_authors(
    State(state): State<crate::AppState>,
    Query(filter): Query<AuthorFilter>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Author>>> {
    let authors = &state.services.authors;
    let (page, size) = params.resolve(0, authors.paging());
    Ok(Json(authors.filter(&filter, page, size).await?))
}

/// Save a new author or update an existing one
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = Author,
    responses(
        (status = 201, description = "Author saved", body = Author),
        (status = 400, description = "Invalid author", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_author(
    State(state): State<crate::AppState>,
    JsonBody(author): JsonBody<Author>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let saved = state.services.authors.save_or_update(author).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete an author no book references
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Author still referenced by a book", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
