// core/src/pipeline/control.rs

//! Flow signals returned by step handlers and by a whole pipeline run.

/// Returned by a handler: keep going, or halt the pipeline here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// No further handlers or steps run.
  Stop,
}

/// Outcome of `Pipeline::run` when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
