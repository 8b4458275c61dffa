// tests/pipeline_execution_tests.rs
mod common;

use catalog_core::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1", false), ("step2", false), ("step3", false)]);

  pipeline.on_root("step1", create_simple_handler("step1", " S1")).unwrap();
  pipeline.on_root("step2", create_simple_handler("step2", " S2")).unwrap();
  pipeline.on_root("step3", create_simple_handler("step3", " S3")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_pipeline_control_stop() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("stepA", false), ("stopStep", false), ("stepC", false)]);

  pipeline.on_root("stepA", create_simple_handler("stepA", "A")).unwrap();
  pipeline.on_root("stopStep", create_simple_handler("stopStep", "Stop")).unwrap();
  pipeline.on_root("stepC", create_simple_handler("stepC", "C")).unwrap();

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("stopStep".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.message, "AStop");
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("good_step", false),
    ("bad_step", false),
    ("another_step", false),
  ]);

  pipeline.on_root("good_step", create_simple_handler("good_step", "Good")).unwrap();
  pipeline.on_root("bad_step", create_failing_handler("bad_step", "I am a bad step!")).unwrap();
  pipeline.on_root("another_step", create_simple_handler("another_step", "NeverRun")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("I am a bad step!".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.counter, 1);
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_multiple_handlers_on_one_step_run_in_registration_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("main_step", false)]);

  pipeline.on_root("main_step", create_simple_handler("first", "1;")).unwrap();
  pipeline.on_root("main_step", create_simple_handler("second", "2;")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "1;2;");
}

#[tokio::test]
#[serial]
async fn test_context_written_by_one_step_is_seen_by_the_next() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("write", false), ("read", false)]);

  pipeline
    .on_root("write", |ctx: ContextData<TestContext>| {
      Box::pin(async move {
        ctx.write().counter = 10;
        Ok::<PipelineControl, TestError>(PipelineControl::Continue)
      })
    })
    .unwrap();
  pipeline
    .on_root("read", |ctx: ContextData<TestContext>| {
      Box::pin(async move {
        let mut guard = ctx.write();
        assert_eq!(guard.counter, 10);
        guard.counter += 5;
        Ok::<PipelineControl, PipelineError>(PipelineControl::Continue)
      })
    })
    .unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().counter, 15);
}

#[tokio::test]
#[serial]
async fn test_optional_step_missing_handler_succeeds() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("optional_step_no_handler", true)]);

  let result = pipeline.run(ContextData::new(TestContext::default())).await;
  assert_eq!(result.unwrap(), PipelineResult::Completed);
}
