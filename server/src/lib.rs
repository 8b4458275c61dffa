// server/src/lib.rs

//! HTTP surface of the product catalog: multipart intake endpoints on actix-web,
//! the Cloudinary uploader and the Postgres product store.

pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::db::PgProductStore;
use crate::errors::{AppError, Result};
use crate::services::CloudinaryUploader;
use crate::state::AppState;
use catalog_core::{ImageUploader, InMemoryProductStore, IntakeService, ProductStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

/// Wires the configured store, the Cloudinary uploader and the intake
/// service together. Creates the upload directory if it is missing.
pub async fn build_app_state(config: Arc<AppConfig>) -> Result<AppState> {
  tokio::fs::create_dir_all(&config.upload_dir).await?;

  let store: Arc<dyn ProductStore> = match config.store_backend {
    StoreBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
      info!("Successfully connected to the database.");

      let store = PgProductStore::new(pool);
      if config.db_auto_migrate {
        store.ensure_schema().await?;
      }
      Arc::new(store)
    }
    StoreBackend::Memory => {
      warn!("Using the in-memory product store; records are lost on restart.");
      Arc::new(InMemoryProductStore::new())
    }
  };

  let uploader: Arc<dyn ImageUploader> =
    Arc::new(CloudinaryUploader::new(reqwest::Client::new(), config.cloudinary.clone()));

  state_with(config, uploader, store)
}

/// Builds state around caller-supplied adapters.
pub fn state_with(
  config: Arc<AppConfig>,
  uploader: Arc<dyn ImageUploader>,
  store: Arc<dyn ProductStore>,
) -> Result<AppState> {
  let intake = IntakeService::new(uploader, store)
    .map_err(|e| AppError::Internal(format!("Failed to build the intake pipeline: {}", e)))?;
  Ok(AppState {
    intake: Arc::new(intake),
    config,
  })
}
