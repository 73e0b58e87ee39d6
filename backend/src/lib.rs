//! # Animal Outcomes Backend
//!
//! REST service over a store of animal shelter outcome records.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum handlers, DTO mappers, error translation)
//!     ↓
//! Domain Layer (AnimalService, CSV import, age and filter rules)
//!     ↓
//! Storage Layer (SQLite repository, upload directory)
//! ```
//!
//! The binary reads an [`config::AppConfig`], builds the [`AppState`] with
//! [`initialize_backend`] and serves [`create_router`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::AnimalService;
use crate::storage::{DbConnection, UploadStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub animal_service: AnimalService<DbConnection>,
}

impl AppState {
    pub fn new(connection: DbConnection, uploads: UploadStore) -> Self {
        Self {
            animal_service: AnimalService::new(Arc::new(connection), uploads),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let connection = DbConnection::new(&config.database_url).await?;

    info!("Uploads will be stored in {}", config.upload_dir.display());
    let uploads = UploadStore::new(&config.upload_dir);

    Ok(AppState::new(connection, uploads))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(io::animal_apis::router())
        .merge(io::upload_apis::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
