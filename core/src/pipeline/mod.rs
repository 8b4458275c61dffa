// core/src/pipeline/mod.rs

//! A small step pipeline: named steps, async handlers over a shared context,
//! early stop, first-error abort.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline, StepDef};
