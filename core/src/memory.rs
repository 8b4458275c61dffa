// core/src/memory.rs

//! In-process adapters for both ports. Used by tests and by the server's
//! `STORE_BACKEND=memory` mode.

use crate::ports::{ImageUploader, ProductStore, StoreError, UploadError, UploadedImage};
use crate::product::{NewProduct, Product};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Fake object store: hands out deterministic URLs and remembers every path
/// it was asked to upload. Can be told to fail on the n-th call.
#[derive(Debug)]
pub struct InMemoryUploader {
  base_url: String,
  fail_on_call: Option<usize>,
  uploaded: Mutex<Vec<PathBuf>>,
}

impl InMemoryUploader {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      fail_on_call: None,
      uploaded: Mutex::new(Vec::new()),
    }
  }

  /// Makes the `call`-th upload (1-based) fail. Earlier uploads still succeed
  /// and stay recorded.
  pub fn failing_on_call(mut self, call: usize) -> Self {
    self.fail_on_call = Some(call);
    self
  }

  /// Paths that were stored successfully, in call order.
  pub fn uploaded_paths(&self) -> Vec<PathBuf> {
    self.uploaded.lock().clone()
  }

  pub fn upload_count(&self) -> usize {
    self.uploaded.lock().len()
  }
}

#[async_trait]
impl ImageUploader for InMemoryUploader {
  #[instrument(name = "InMemoryUploader::upload", skip(self), fields(path = %path.display()))]
  async fn upload(&self, path: &Path) -> Result<UploadedImage, UploadError> {
    let mut uploaded = self.uploaded.lock();
    let call = uploaded.len() + 1;
    if self.fail_on_call == Some(call) {
      warn!(call, "Simulated upload failure.");
      return Err(UploadError::Rejected {
        status: 500,
        message: format!("simulated failure on upload #{}", call),
      });
    }

    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "file".to_string());
    let public_id = format!("{}-{}", call, file_name);
    uploaded.push(path.to_path_buf());
    debug!(public_id = %public_id, "Stored image in memory.");

    Ok(UploadedImage {
      url: format!("{}/{}", self.base_url.trim_end_matches('/'), public_id),
      public_id,
    })
  }
}

/// Product store backed by a locked `Vec`; enforces unique names like the
/// database does.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
  products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn all(&self) -> Vec<Product> {
    self.products.read().clone()
  }

  pub fn find_by_name(&self, name: &str) -> Option<Product> {
    self.products.read().iter().find(|p| p.name == name).cloned()
  }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
  #[instrument(name = "InMemoryProductStore::create", skip(self, new_product), fields(name = %new_product.name))]
  async fn create(&self, new_product: NewProduct) -> Result<Product, StoreError> {
    let mut products = self.products.write();
    if products.iter().any(|p| p.name == new_product.name) {
      warn!("Duplicate product name rejected.");
      return Err(StoreError::DuplicateName(new_product.name));
    }
    let product = Product::from_new(new_product, Uuid::new_v4(), Utc::now());
    products.push(product.clone());
    info!(product_id = %product.id, "Product stored in memory.");
    Ok(product)
  }

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(self.products.read().len() as u64)
  }
}
