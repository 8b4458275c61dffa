// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Which `ProductStore` the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

/// Cloudinary credentials. All three are optional at startup; uploads fail
/// until they are present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CloudinaryConfig {
  pub cloud_name: Option<String>,
  pub api_key: Option<String>,
  pub api_secret: Option<String>,
}

impl CloudinaryConfig {
  pub fn is_complete(&self) -> bool {
    self.cloud_name.is_some() && self.api_key.is_some() && self.api_secret.is_some()
  }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for CloudinaryConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CloudinaryConfig")
      .field("cloud_name", &self.cloud_name)
      .field("api_key", &self.api_key)
      .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
      .finish()
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub db_auto_migrate: bool,
  /// Local directory that receives uploaded files; served read-only under `/uploads`.
  pub upload_dir: PathBuf,
  pub cloudinary: CloudinaryConfig,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Loads `.env` (if present) and reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| lookup(var_name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "3000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = match get_env("STORE_BACKEND").as_deref() {
      None | Some("postgres") => StoreBackend::Postgres,
      Some("memory") => StoreBackend::Memory,
      Some(other) => {
        return Err(AppError::Config(format!(
          "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
          other
        )))
      }
    };

    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE_BACKEND=postgres)".to_string(),
      ));
    }

    let db_auto_migrate = get_env("DB_AUTO_MIGRATE")
      .unwrap_or_else(|| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid DB_AUTO_MIGRATE value: {}", e)))?;

    let upload_dir = PathBuf::from(get_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()));

    let cloudinary = CloudinaryConfig {
      cloud_name: get_env("CLOUDINARY_CLOUD_NAME"),
      api_key: get_env("CLOUDINARY_API_KEY"),
      api_secret: get_env("CLOUDINARY_API_SECRET"),
    };

    let log_format = match get_env("LOG_FORMAT").as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      db_auto_migrate,
      upload_dir,
      cloudinary,
      log_format,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_the_database_is_set() {
    let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/catalog")])).unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 3000);
    assert_eq!(config.store_backend, StoreBackend::Postgres);
    assert!(config.db_auto_migrate);
    assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    assert!(!config.cloudinary.is_complete());
    assert_eq!(config.log_format, LogFormat::Pretty);
  }

  #[test]
  fn postgres_backend_requires_database_url() {
    let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("DATABASE_URL")));
  }

  #[test]
  fn memory_backend_needs_no_database() {
    let config = AppConfig::from_lookup(lookup(&[
      ("STORE_BACKEND", "memory"),
      ("SERVER_PORT", "8088"),
      ("CLOUDINARY_CLOUD_NAME", "demo"),
      ("CLOUDINARY_API_KEY", "123"),
      ("CLOUDINARY_API_SECRET", "shh"),
    ]))
    .unwrap();
    assert_eq!(config.store_backend, StoreBackend::Memory);
    assert_eq!(config.server_port, 8088);
    assert!(config.cloudinary.is_complete());
    assert!(!format!("{:?}", config.cloudinary).contains("shh"));
  }

  #[test]
  fn invalid_values_are_config_errors() {
    assert!(AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("SERVER_PORT", "http")])).is_err());
    assert!(AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "mongo")])).is_err());
    assert!(AppConfig::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("LOG_FORMAT", "xml")])).is_err());
  }
}
