// core/src/ports/uploader.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What the object store hands back for one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
  /// Durable, publicly resolvable URL.
  pub url: String,
  /// Provider-side identifier of the stored object.
  pub public_id: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
  /// Credentials are missing; every upload fails until they are provided.
  #[error("Object store is not configured: {0}")]
  NotConfigured(String),

  #[error("Failed to read '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Object store rejected the upload (status {status}): {message}")]
  Rejected { status: u16, message: String },

  #[error("Object store request failed: {source}")]
  Transport {
    #[source]
    source: anyhow::Error,
  },
}

/// Stores one local file remotely and returns its durable URL.
///
/// Called once per file with no retry: a single failure is final for the
/// enclosing request.
#[async_trait]
pub trait ImageUploader: Send + Sync {
  async fn upload(&self, path: &Path) -> Result<UploadedImage, UploadError>;
}
