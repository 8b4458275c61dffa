// core/src/ports/store.rs

use crate::product::{NewProduct, Product};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  /// Another record already uses this name.
  #[error("A product named '{0}' already exists")]
  DuplicateName(String),

  #[error("Product store backend error: {source}")]
  Backend {
    #[source]
    source: anyhow::Error,
  },
}

/// Persists product records. Each `create` is atomic and independent of
/// every other; no transaction spans records or uploads.
#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Assigns id and timestamps and stores the record, enforcing unique names.
  async fn create(&self, new_product: NewProduct) -> Result<Product, StoreError>;

  async fn count(&self) -> Result<u64, StoreError>;
}
