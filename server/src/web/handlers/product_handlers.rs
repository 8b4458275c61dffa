// server/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use catalog_core::Product;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::multipart::{receive_product_upload, MULTI_IMAGE_FIELD, SINGLE_IMAGE_FIELD};

fn created_response(product: &Product) -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "message": "Product uploaded successfully!",
      "product": product
  }))
}

/// `POST /api/v1/product`: any number of files under `photos[]`.
#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let upload = receive_product_upload(payload, &app_state.config.upload_dir, MULTI_IMAGE_FIELD).await?;
  info!("Received product form with {} image(s).", upload.files.len());

  let paths = upload.paths();
  let product = app_state
    .intake
    .create_with_images(upload.form, paths)
    .await
    .map_err(AppError::from)
    .inspect_err(|e| error!("Product intake failed: {}", e))?;

  info!(product_id = %product.id, "Product created.");
  Ok(created_response(&product))
}

/// `POST /api/v1/product/singleImage`: exactly one file under `avatar`.
#[instrument(name = "handler::create_product_single_image", skip(app_state, payload))]
pub async fn create_product_single_image_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let mut upload = receive_product_upload(payload, &app_state.config.upload_dir, SINGLE_IMAGE_FIELD).await?;

  let file = match upload.files.len() {
    1 => upload.files.remove(0),
    0 => {
      warn!("Single-image upload arrived without a file.");
      return Err(AppError::BadRequest(format!("Expected one file under '{}'", SINGLE_IMAGE_FIELD)));
    }
    n => {
      warn!("Single-image upload arrived with {} files.", n);
      return Err(AppError::BadRequest(format!(
        "Expected exactly one file under '{}', got {}",
        SINGLE_IMAGE_FIELD, n
      )));
    }
  };

  let product = app_state
    .intake
    .create_with_single_image(upload.form, file.path)
    .await
    .map_err(AppError::from)
    .inspect_err(|e| error!("Single-image product intake failed: {}", e))?;

  info!(product_id = %product.id, "Product created.");
  Ok(created_response(&product))
}
