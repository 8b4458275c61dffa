// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use catalog_core::validation::MSG_NAME_NOT_UNIQUE;
use catalog_core::{FieldErrors, IntakeError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(FieldErrors),

  #[error("Duplicate product name: {0}")]
  DuplicateName(String),

  /// Malformed multipart bodies and unexpected, missing or extra files.
  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Intake Error: {0}")]
  Intake(IntakeError),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<IntakeError> for AppError {
  fn from(err: IntakeError) -> Self {
    match err {
      IntakeError::Validation(fields) => AppError::Validation(fields),
      IntakeError::DuplicateName(name) => AppError::DuplicateName(name),
      other => AppError::Intake(other),
    }
  }
}

impl From<actix_multipart::MultipartError> for AppError {
  fn from(err: actix_multipart::MultipartError) -> Self {
    AppError::BadRequest(format!("Malformed multipart body: {}", err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::DuplicateName(_) => StatusCode::CONFLICT,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Intake(_)
      | AppError::Io(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }

    let body = match self {
      AppError::Validation(fields) => json!({"error": "Validation failed", "fields": fields}),
      AppError::DuplicateName(_) => json!({
        "error": "Validation failed",
        "fields": FieldErrors::single("name", MSG_NAME_NOT_UNIQUE),
      }),
      AppError::BadRequest(m) => json!({"error": m}),
      // Server-side details stay in the logs.
      _ => json!({"error": "Internal server error"}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
