//! OPL catalog server
//!
//! REST JSON API over a library catalog of books, authors, publishers and
//! tags, with optional-criteria filtering, paged listings and rule-based
//! validation of every record before it is stored.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
