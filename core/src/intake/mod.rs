// core/src/intake/mod.rs

//! Product intake: receive files, upload each one, build the record, persist it.

pub mod context;
pub mod steps;

pub use context::{IntakeCtxData, IntakeFiles};
pub use steps::build_intake_pipeline;

use crate::error::{IntakeError, IntakeResult, PipelineError};
use crate::pipeline::{ContextData, Pipeline};
use crate::ports::{ImageUploader, ProductStore};
use crate::product::Product;
use crate::validation::ProductForm;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

/// Runs the intake pipeline for both intake variants.
///
/// Built once at startup and shared by every request; it holds no
/// per-request state.
pub struct IntakeService {
  pipeline: Pipeline<IntakeCtxData, IntakeError>,
}

impl IntakeService {
  pub fn new(uploader: Arc<dyn ImageUploader>, store: Arc<dyn ProductStore>) -> Result<Self, PipelineError> {
    let pipeline = build_intake_pipeline(uploader, store)?;
    Ok(Self { pipeline })
  }

  /// Multi-image intake: every file ends up in `multiple_images`, in order.
  #[instrument(name = "IntakeService::create_with_images", skip_all, fields(file_count = files.len()))]
  pub async fn create_with_images(&self, form: ProductForm, files: Vec<PathBuf>) -> IntakeResult<Product> {
    self.run(IntakeCtxData::new(form, IntakeFiles::Multiple(files))).await
  }

  /// Single-image intake: the file ends up in `image`.
  #[instrument(name = "IntakeService::create_with_single_image", skip_all, fields(file = %file.display()))]
  pub async fn create_with_single_image(&self, form: ProductForm, file: PathBuf) -> IntakeResult<Product> {
    self.run(IntakeCtxData::new(form, IntakeFiles::Single(file))).await
  }

  /// No intake step halts the pipeline, so a run that ends without a
  /// persisted product is an internal fault.
  async fn run(&self, ctx: IntakeCtxData) -> IntakeResult<Product> {
    let ctx_data = ContextData::new(ctx);
    self.pipeline.run(ctx_data.clone()).await?;
    let product = ctx_data.write().product.take();
    product.ok_or_else(|| IntakeError::Internal("intake finished without a persisted product".to_string()))
  }
}
