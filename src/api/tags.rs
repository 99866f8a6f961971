//! Tags API endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::extract::{JsonBody, Path};
use crate::{error::AppResult, models::Tag};

/// List every tag
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>)
    )
)]
pub async fn list_tags(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = state.services.tags.list_all_unpaged().await?;
    Ok(Json(tags))
}

/// Get tag by ID
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag details", body = Tag),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Tag>> {
    let tag = state.services.tags.get_by_id(id).await?;
    Ok(Json(tag))
}

/// Save a new tag or rename an existing one
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    request_body = Tag,
    responses(
        (status = 201, description = "Tag saved", body = Tag),
        (status = 400, description = "Invalid tag", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_tag(
    State(state): State<crate::AppState>,
    JsonBody(tag): JsonBody<Tag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let saved = state.services.tags.save_or_update(tag).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_tag(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.tags.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
