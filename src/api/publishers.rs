//! Publishers API endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::Publisher,
    pagination::PagedResponse,
    query::PublisherFilter,
};

use super::{
    extract::{JsonBody, Path, Query},
    PageParams,
};

/// Get publisher by ID
#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher details", body = Publisher),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_publisher(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Publisher>> {
    let publisher = state.services.publishers.get_by_id(id).await?;
    Ok(Json(publisher))
}

/// List all publishers ordered by name
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    params(PageParams),
    responses(
        (status = 200, description = "Page of publishers", body = super::openapi::PublisherPage)
    )
)]
pub async fn list_publishers(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Publisher>>> {
    let publishers = &state.services.publishers;
    let (page, size) = params.resolve(0, publishers.paging());
    Ok(Json(publishers.list_all(page, size).await?))
}

/// Filter publishers by name pattern
#[utoipa::path(
    get,
    path = "/publishers/filter",
    tag = "publishers",
    params(PublisherFilter, PageParams),
    responses(
        (status = 200, description = "Page of matching publishers", body = super::openapi::PublisherPage)
    )
)]
pub async fn filter_publishers(
    State(state): State<crate::AppState>,
    Query(filter): Query<PublisherFilter>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PagedResponse<Publisher>>> {
    let publishers = &state.services.publishers;
    let (page, size) = params.resolve(0, publishers.paging());
    Ok(Json(publishers.filter(&filter, page, size).await?))
}

/// Save a new publisher or update an existing one
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    request_body = Publisher,
    responses(
        (status = 201, description = "Publisher saved", body = Publisher),
        (status = 400, description = "Invalid publisher", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_publisher(
    State(state): State<crate::AppState>,
    JsonBody(publisher): JsonBody<Publisher>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    let saved = state.services.publishers.save_or_update(publisher).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete a publisher no book references
#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher ID")),
    responses(
        (status = 204, description = "Publisher deleted"),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_publisher(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.publishers.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
