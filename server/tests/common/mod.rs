// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use catalog_core::{InMemoryProductStore, InMemoryUploader, NewProduct, Product, ProductStore, StoreError};
use catalog_server::config::{AppConfig, CloudinaryConfig, LogFormat, StoreBackend};
use catalog_server::state::AppState;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

pub const BOUNDARY: &str = "----catalog-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
  body: Vec<u8>,
}

impl MultipartBody {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn text(mut self, name: &str, value: &str) -> Self {
    self.body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
      )
      .as_bytes(),
    );
    self
  }

  pub fn file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
    self.body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
        BOUNDARY, name, filename
      )
      .as_bytes(),
    );
    self.body.extend_from_slice(content);
    self.body.extend_from_slice(b"\r\n");
    self
  }

  pub fn product_fields(self, name: &str) -> Self {
    self
      .text("name", name)
      .text("description", "Long grain basmati rice")
      .text("price", "12.5")
      .text("unit", "kg")
      .text("quantity", "5")
  }

  pub fn finish(mut self) -> Vec<u8> {
    self.body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    self.body
  }

  pub fn content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
  }
}

pub struct TestApp {
  pub state: AppState,
  pub uploader: Arc<InMemoryUploader>,
  pub store: Arc<InMemoryProductStore>,
  pub upload_dir: TempDir,
}

pub fn test_config(upload_dir: &TempDir) -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    store_backend: StoreBackend::Memory,
    database_url: None,
    db_auto_migrate: false,
    upload_dir: upload_dir.path().to_path_buf(),
    cloudinary: CloudinaryConfig::default(),
    log_format: LogFormat::Pretty,
  }
}

pub fn test_app() -> TestApp {
  test_app_with(InMemoryUploader::new("https://images.test/catalog"))
}

pub fn test_app_with(uploader: InMemoryUploader) -> TestApp {
  Lazy::force(&TRACING);
  let upload_dir = tempfile::tempdir().expect("temp upload dir");
  let uploader = Arc::new(uploader);
  let store = Arc::new(InMemoryProductStore::new());
  let state = catalog_server::state_with(Arc::new(test_config(&upload_dir)), uploader.clone(), store.clone())
    .expect("app state builds");
  TestApp {
    state,
    uploader,
    store,
    upload_dir,
  }
}

/// Store whose database is unreachable.
pub struct FailingProductStore;

#[async_trait::async_trait]
impl ProductStore for FailingProductStore {
  async fn create(&self, _new_product: NewProduct) -> Result<Product, StoreError> {
    Err(StoreError::Backend {
      source: anyhow::anyhow!("connection refused"),
    })
  }

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(0)
  }
}

pub struct FailingStoreApp {
  pub state: AppState,
  pub uploader: Arc<InMemoryUploader>,
  pub upload_dir: TempDir,
}

pub fn failing_store_app() -> FailingStoreApp {
  Lazy::force(&TRACING);
  let upload_dir = tempfile::tempdir().expect("temp upload dir");
  let uploader = Arc::new(InMemoryUploader::new("https://images.test/catalog"));
  let state = catalog_server::state_with(
    Arc::new(test_config(&upload_dir)),
    uploader.clone(),
    Arc::new(FailingProductStore),
  )
  .expect("app state builds");
  FailingStoreApp {
    state,
    uploader,
    upload_dir,
  }
}

pub static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});
