// core/src/intake/steps.rs

//! The intake pipeline: `validate_form → upload_images → build_record → persist_record`.

use super::context::IntakeCtxData;
use crate::error::{IntakeError, PipelineError};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::ports::{ImageUploader, ProductStore, StoreError};
use crate::validation;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const STEP_VALIDATE_FORM: &str = "validate_form";
pub const STEP_UPLOAD_IMAGES: &str = "upload_images";
pub const STEP_BUILD_RECORD: &str = "build_record";
pub const STEP_PERSIST_RECORD: &str = "persist_record";

/// Builds the intake pipeline over the given collaborators.
pub fn build_intake_pipeline(
  uploader: Arc<dyn ImageUploader>,
  store: Arc<dyn ProductStore>,
) -> Result<Pipeline<IntakeCtxData, IntakeError>, PipelineError> {
  let mut p = Pipeline::<IntakeCtxData, IntakeError>::new(&[
    (STEP_VALIDATE_FORM, false),
    (STEP_UPLOAD_IMAGES, false),
    (STEP_BUILD_RECORD, false),
    (STEP_PERSIST_RECORD, false),
  ]);

  // Step 1: reject bad form input before anything leaves the process.
  p.on_root(STEP_VALIDATE_FORM, |ctx_data: ContextData<IntakeCtxData>| {
    Box::pin(async move {
      let form = { ctx_data.read().form.clone() };
      match validation::validate_form(&form) {
        Ok(()) => {
          debug!("Intake: form fields valid.");
          Ok(PipelineControl::Continue)
        }
        Err(errors) => {
          warn!(%errors, "Intake: form validation failed.");
          Err(IntakeError::Validation(errors))
        }
      }
    })
  })?;

  // Step 2: one upload at a time, in attachment order. No retry and no
  // rollback: a failure leaves earlier uploads in the remote store.
  p.on_root(STEP_UPLOAD_IMAGES, move |ctx_data: ContextData<IntakeCtxData>| {
    let uploader = uploader.clone();
    Box::pin(async move {
      let paths = { ctx_data.read().files.paths() };
      info!(file_count = paths.len(), "Intake: uploading images.");

      for path in paths {
        match uploader.upload(&path).await {
          Ok(image) => {
            debug!(path = %path.display(), url = %image.url, "Intake: image uploaded.");
            ctx_data.write().uploaded.push(image);
          }
          Err(source) => {
            let orphaned = { ctx_data.read().uploaded_urls() };
            if !orphaned.is_empty() {
              warn!(?orphaned, "Intake: upload failed; earlier uploads stay in the object store.");
            }
            return Err(IntakeError::Upload {
              path,
              source,
              orphaned,
            });
          }
        }
      }
      Ok(PipelineControl::Continue)
    })
  })?;

  // Step 3: assemble the record from form fields and uploaded URLs.
  p.on_root(STEP_BUILD_RECORD, |ctx_data: ContextData<IntakeCtxData>| {
    Box::pin(async move {
      let built = {
        let guard = ctx_data.read();
        let images = guard
          .image_set()
          .ok_or_else(|| IntakeError::Internal("single-image intake finished without an upload".to_string()))?;
        guard.form.validate(images)
      };
      match built {
        Ok(new_product) => {
          ctx_data.write().new_product = Some(new_product);
          Ok(PipelineControl::Continue)
        }
        Err(errors) => Err(IntakeError::Validation(errors)),
      }
    })
  })?;

  // Step 4: persist. Uniqueness of the name is decided by the store.
  p.on_root(STEP_PERSIST_RECORD, move |ctx_data: ContextData<IntakeCtxData>| {
    let store = store.clone();
    Box::pin(async move {
      let new_product = {
        ctx_data
          .write()
          .new_product
          .take()
          .ok_or_else(|| IntakeError::Internal("no record was built before persisting".to_string()))?
      };

      match store.create(new_product).await {
        Ok(product) => {
          info!(product_id = %product.id, name = %product.name, "Intake: product persisted.");
          ctx_data.write().product = Some(product);
          Ok(PipelineControl::Continue)
        }
        Err(StoreError::DuplicateName(name)) => {
          let orphaned = { ctx_data.read().uploaded_urls() };
          if !orphaned.is_empty() {
            warn!(?orphaned, "Intake: duplicate name; uploaded images are left without a record.");
          }
          Err(IntakeError::DuplicateName(name))
        }
        Err(source) => {
          let orphaned = { ctx_data.read().uploaded_urls() };
          warn!(?orphaned, error = %source, "Intake: persisting failed; uploaded images are left without a record.");
          Err(IntakeError::Store { source, orphaned })
        }
      }
    })
  })?;

  Ok(p)
}
