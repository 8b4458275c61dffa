// server/src/services/cloudinary.rs

//! `ImageUploader` backed by Cloudinary's signed upload API.

use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use catalog_core::{ImageUploader, UploadError, UploadedImage};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::Path;
use tracing::{info, instrument, warn};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
  secure_url: String,
  public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
  error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

/// Signs request parameters the way Cloudinary expects: `key=value` pairs
/// sorted by key, joined with `&`, followed by the API secret, SHA-1, hex.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
  let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
  sorted.sort_by(|a, b| a.0.cmp(b.0));
  let to_sign = sorted
    .iter()
    .map(|(k, v)| format!("{}={}", k, v))
    .collect::<Vec<_>>()
    .join("&");

  let mut hasher = Sha1::new();
  hasher.update(to_sign.as_bytes());
  hasher.update(api_secret.as_bytes());
  hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

pub struct CloudinaryUploader {
  client: reqwest::Client,
  config: CloudinaryConfig,
  api_base: String,
}

impl CloudinaryUploader {
  pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
    if !config.is_complete() {
      warn!("Cloudinary credentials are incomplete; image uploads will fail until they are set.");
    }
    Self {
      client,
      config,
      api_base: DEFAULT_API_BASE.to_string(),
    }
  }

  /// Points the uploader at another API host (a proxy or a local stand-in).
  pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
    self.api_base = api_base.into();
    self
  }

  fn credentials(&self) -> Result<(&str, &str, &str), UploadError> {
    match (&self.config.cloud_name, &self.config.api_key, &self.config.api_secret) {
      (Some(cloud_name), Some(api_key), Some(api_secret)) => {
        Ok((cloud_name.as_str(), api_key.as_str(), api_secret.as_str()))
      }
      _ => Err(UploadError::NotConfigured(
        "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must all be set".to_string(),
      )),
    }
  }

  fn upload_url(&self, cloud_name: &str) -> String {
    format!("{}/v1_1/{}/image/upload", self.api_base.trim_end_matches('/'), cloud_name)
  }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
  #[instrument(name = "CloudinaryUploader::upload", skip(self), fields(path = %path.display()), err(Display))]
  async fn upload(&self, path: &Path) -> Result<UploadedImage, UploadError> {
    let (cloud_name, api_key, api_secret) = self.credentials()?;

    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "upload".to_string());

    let timestamp = Utc::now().timestamp().to_string();
    let signature = sign_params(&[("timestamp", timestamp.as_str())], api_secret);

    let form = Form::new()
      .text("api_key", api_key.to_string())
      .text("timestamp", timestamp)
      .text("signature", signature)
      .part("file", Part::bytes(bytes).file_name(file_name));

    let response = self
      .client
      .post(self.upload_url(cloud_name))
      .multipart(form)
      .send()
      .await
      .map_err(|e| UploadError::Transport { source: e.into() })?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
      return Err(UploadError::Rejected {
        status: status.as_u16(),
        message,
      });
    }

    let uploaded: UploadResponse = response
      .json()
      .await
      .map_err(|e| UploadError::Transport { source: e.into() })?;
    info!(public_id = %uploaded.public_id, "Image stored in Cloudinary.");

    Ok(UploadedImage {
      url: uploaded.secure_url,
      public_id: uploaded.public_id,
    })
  }
}
