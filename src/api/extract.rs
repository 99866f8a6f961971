//! Request extractors whose rejections are reported as [`AppError`]

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// Query string deserialized into `T`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Path segment deserialized into `T`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// JSON request body deserialized into `T`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
