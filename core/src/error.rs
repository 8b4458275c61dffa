// core/src/error.rs

//! Error types for every layer of the intake core.

use crate::ports::{StoreError, UploadError};
use crate::validation::FieldErrors;
use std::path::PathBuf;
use thiserror::Error;

/// Framework-level failures of the step pipeline itself (setup mistakes,
/// steps left without handlers).
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}

/// Everything that can go wrong while taking in one product.
#[derive(Debug, Error)]
pub enum IntakeError {
  /// The form fields broke one or more record rules.
  #[error("Validation failed: {0}")]
  Validation(FieldErrors),

  /// The store already holds a product with this (trimmed) name.
  #[error("A product named '{0}' already exists")]
  DuplicateName(String),

  /// An upload failed. `orphaned` lists the URLs already stored remotely
  /// during the same request; they are not removed.
  #[error("Image upload failed for '{}': {source}", path.display())]
  Upload {
    path: PathBuf,
    #[source]
    source: UploadError,
    orphaned: Vec<String>,
  },

  /// Persisting the record failed after all uploads succeeded.
  #[error("Product store failure: {source}")]
  Store {
    #[source]
    source: StoreError,
    orphaned: Vec<String>,
  },

  #[error("Intake pipeline error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Internal intake error: {0}")]
  Internal(String),
}

impl IntakeError {
  /// Remote image URLs left behind by this failure, if any.
  pub fn orphaned_images(&self) -> &[String] {
    match self {
      IntakeError::Upload { orphaned, .. } | IntakeError::Store { orphaned, .. } => orphaned,
      _ => &[],
    }
  }
}

pub type IntakeResult<T, E = IntakeError> = std::result::Result<T, E>;
