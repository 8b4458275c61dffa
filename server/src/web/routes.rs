// server/src/web/routes.rs

use actix_web::{web, HttpResponse};
use std::path::Path;

use crate::web::handlers::product_handlers;

async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Route is working! YaY!")
}

/// Mounts every route of the catalog API. `upload_dir` is served read-only
/// under `/uploads`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
  cfg
    .route("/", web::get().to(root_handler))
    .service(
      web::scope("/api/v1/product")
        .route("", web::post().to(product_handlers::create_product_handler))
        .route(
          "/singleImage",
          web::post().to(product_handlers::create_product_single_image_handler),
        ),
    )
    .service(actix_files::Files::new("/uploads", upload_dir));
}
