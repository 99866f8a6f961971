//! Error types for the OPL catalog server

use std::collections::BTreeSet;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::EntityKind;

/// SQLSTATE raised by Postgres on foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Error codes reported in the `code` field of error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NoSuchRecord = 1,
    InvalidRecord = 2,
    BadValue = 3,
    StoreFailure = 4,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Invalid record: {}", .0.iter().cloned().collect::<Vec<_>>().join(", "))]
    InvalidRecord(BTreeSet<String>),

    #[error("{0}")]
    MalformedRequest(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        AppError::NotFound { kind, id }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return AppError::MalformedRequest(
                    "Record references a missing record or is still referenced".to_string(),
                );
            }
        }
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Every violated validation rule, for invalid records
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::NotFound { kind, id } => {
                let message = format!("{} with id {} not found", kind, id);
                tracing::warn!("Resource not found: {}", message);
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, message, Vec::new())
            }
            AppError::InvalidRecord(messages) => {
                tracing::warn!("Constraint violations: {:?}", messages);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidRecord,
                    "Record failed validation".to_string(),
                    messages.into_iter().collect(),
                )
            }
            AppError::MalformedRequest(msg) => {
                tracing::warn!("Malformed request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, Vec::new())
            }
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Store error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreFailure,
                    "Store unavailable".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
