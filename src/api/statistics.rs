//! Statistics API endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;

/// Total number of books
#[utoipa::path(
    get,
    path = "/statistics/books-total",
    tag = "statistics",
    responses(
        (status = 200, description = "Number of stored books", body = i64)
    )
)]
pub async fn books_total(State(state): State<crate::AppState>) -> AppResult<Json<i64>> {
    Ok(Json(state.services.books.count().await?))
}

/// Total number of authors
#[utoipa::path(
    get,
    path = "/statistics/authors-total",
    tag = "statistics",
    responses(
        (status = 200, description = "Number of stored authors", body = i64)
    )
)]
pub async fn authors_total(State(state): State<crate::AppState>) -> AppResult<Json<i64>> {
    Ok(Json(state.services.authors.count().await?))
}

/// Total number of publishers
#[utoipa::path(
    get,
    path = "/statistics/publishers-total",
    tag = "statistics",
    responses(
        (status = 200, description = "Number of stored publishers", body = i64)
    )
)]
pub async fn publishers_total(State(state): State<crate::AppState>) -> AppResult<Json<i64>> {
    Ok(Json(state.services.publishers.count().await?))
}
