// server/src/web/multipart.rs

//! Reads a product multipart body: text fields go into a `ProductForm`, file
//! parts are spooled to the upload directory under unique names.

use crate::errors::{AppError, Result};
use actix_multipart::{Field, Multipart};
use catalog_core::ProductForm;
use chrono::Utc;
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// File field of the multi-image intake.
pub const MULTI_IMAGE_FIELD: &str = "photos[]";
/// File field of the single-image intake.
pub const SINGLE_IMAGE_FIELD: &str = "avatar";

const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;
const MAX_EXTENSION_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct SpooledFile {
  pub path: PathBuf,
  pub original_name: String,
  pub size: u64,
}

#[derive(Debug, Default)]
pub struct ReceivedUpload {
  pub form: ProductForm,
  /// In the order the parts appeared in the body.
  pub files: Vec<SpooledFile>,
}

impl ReceivedUpload {
  pub fn paths(&self) -> Vec<PathBuf> {
    self.files.iter().map(|f| f.path.clone()).collect()
  }
}

/// Drains the multipart stream. A file part under any name other than
/// `file_field` is a bad request; unknown text fields are dropped.
#[instrument(name = "multipart::receive", skip(payload), fields(upload_dir = %upload_dir.display()))]
pub async fn receive_product_upload(
  mut payload: Multipart,
  upload_dir: &Path,
  file_field: &str,
) -> Result<ReceivedUpload> {
  let mut received = ReceivedUpload::default();

  while let Some(mut field) = payload.try_next().await? {
    let field_name = field.name().unwrap_or_default().to_string();
    let file_name = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_string);

    match file_name {
      Some(original_name) => {
        if field_name != file_field {
          return Err(AppError::BadRequest(format!(
            "Unexpected file field '{}', expected '{}'",
            field_name, file_field
          )));
        }
        let spooled = spool_file(&mut field, upload_dir, &original_name).await?;
        info!(
          original_name = %spooled.original_name,
          path = %spooled.path.display(),
          size = spooled.size,
          "File received."
        );
        received.files.push(spooled);
      }
      None => {
        let value = read_text(&mut field, &field_name).await?;
        if !received.form.set_field(&field_name, value) {
          debug!(field = %field_name, "Ignoring unknown form field.");
        }
      }
    }
  }

  Ok(received)
}

async fn read_text(field: &mut Field, field_name: &str) -> Result<String> {
  let mut buf = Vec::new();
  while let Some(chunk) = field.try_next().await? {
    if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
      return Err(AppError::BadRequest(format!("Field '{}' is too large", field_name)));
    }
    buf.extend_from_slice(&chunk);
  }
  String::from_utf8(buf).map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", field_name)))
}

async fn spool_file(field: &mut Field, upload_dir: &Path, original_name: &str) -> Result<SpooledFile> {
  let path = upload_dir.join(spool_name(original_name));
  let mut file = tokio::fs::File::create(&path).await?;
  let mut size = 0u64;
  while let Some(chunk) = field.try_next().await? {
    size += chunk.len() as u64;
    file.write_all(&chunk).await?;
  }
  file.flush().await?;

  Ok(SpooledFile {
    path,
    original_name: original_name.to_string(),
    size,
  })
}

/// `{unix millis}-{uuid}{.ext}`. Only a short alphanumeric extension of the
/// client's filename survives; the rest never touches the filesystem.
fn spool_name(original_name: &str) -> String {
  let extension = Path::new(original_name)
    .extension()
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.len() <= MAX_EXTENSION_CHARS && e.chars().all(|c| c.is_ascii_alphanumeric()))
    .map(|e| format!(".{}", e.to_ascii_lowercase()))
    .unwrap_or_default();
  format!("{}-{}{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple(), extension)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn spool_name_keeps_a_clean_extension() {
    let name = spool_name("Rice Bag.JPG");
    assert!(name.ends_with(".jpg"));
    assert!(!name.contains(' '));
  }

  #[test]
  fn spool_name_drops_suspicious_extensions() {
    assert!(!spool_name("../../etc/passwd").contains('/'));
    assert!(!spool_name("photo.j/pg").contains('/'));
    assert!(!spool_name("noext").contains('.'));
  }

  #[test]
  fn spool_names_are_unique() {
    assert_ne!(spool_name("a.png"), spool_name("a.png"));
  }
}
