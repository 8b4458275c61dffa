// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use catalog_core::pipeline::Handler;
use catalog_core::{
  ContextData, InMemoryProductStore, InMemoryUploader, IntakeService, NewProduct, PipelineControl, PipelineError,
  Product, ProductForm, ProductStore, StoreError,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

// --- Pipeline test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline framework error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(format!("{:?}", pe))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Intake fixtures ---
pub struct IntakeHarness {
  pub uploader: Arc<InMemoryUploader>,
  pub store: Arc<InMemoryProductStore>,
  pub service: IntakeService,
}

pub fn intake_harness() -> IntakeHarness {
  intake_harness_with(InMemoryUploader::new("https://images.test/catalog"))
}

pub fn intake_harness_with(uploader: InMemoryUploader) -> IntakeHarness {
  let uploader = Arc::new(uploader);
  let store = Arc::new(InMemoryProductStore::new());
  let service = IntakeService::new(uploader.clone(), store.clone()).expect("intake pipeline builds");
  IntakeHarness {
    uploader,
    store,
    service,
  }
}

/// Store whose backend is down: every create fails, nothing is kept.
#[derive(Debug, Default)]
pub struct FailingProductStore {
  pub create_attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl ProductStore for FailingProductStore {
  async fn create(&self, _new_product: NewProduct) -> Result<Product, StoreError> {
    self.create_attempts.fetch_add(1, Ordering::SeqCst);
    Err(StoreError::Backend {
      source: anyhow::anyhow!("connection refused"),
    })
  }

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(0)
  }
}

pub struct FailingStoreHarness {
  pub uploader: Arc<InMemoryUploader>,
  pub store: Arc<FailingProductStore>,
  pub service: IntakeService,
}

pub fn failing_store_harness() -> FailingStoreHarness {
  let uploader = Arc::new(InMemoryUploader::new("https://images.test/catalog"));
  let store = Arc::new(FailingProductStore::default());
  let service = IntakeService::new(uploader.clone(), store.clone()).expect("intake pipeline builds");
  FailingStoreHarness {
    uploader,
    store,
    service,
  }
}

pub fn product_form(name: &str, price: &str, unit: &str, quantity: &str) -> ProductForm {
  ProductForm {
    name: Some(name.to_string()),
    description: Some("Test product".to_string()),
    price: Some(price.to_string()),
    unit: Some(unit.to_string()),
    quantity: Some(quantity.to_string()),
    status: None,
  }
}

/// Paths only; the in-memory uploader never opens them.
pub fn spooled_paths(count: usize) -> Vec<PathBuf> {
  (1..=count).map(|i| PathBuf::from(format!("uploads/photo-{}.jpg", i))).collect()
}

// --- Tracing setup (once per test binary) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
