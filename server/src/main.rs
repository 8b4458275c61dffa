// server/src/main.rs

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use catalog_server::config::AppConfig;
use catalog_server::telemetry::init_tracing;
use catalog_server::{build_app_state, web::configure_app_routes};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);
  tracing::info!("Starting product catalog server...");

  let app_state = build_app_state(app_config.clone())
    .await
    .context("Failed to initialise application state")?;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let upload_dir = app_config.upload_dir.clone();
  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(|cfg| configure_app_routes(cfg, &upload_dir))
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
