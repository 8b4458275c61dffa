// server/src/state.rs
use crate::config::AppConfig;
use catalog_core::IntakeService;
use std::sync::Arc;

/// Process-wide collaborators, built once in `build_app_state` and cloned into
/// every actix worker.
#[derive(Clone)]
pub struct AppState {
  pub intake: Arc<IntakeService>,
  pub config: Arc<AppConfig>,
}
