// core/src/lib.rs

//! Catalog core: the product record, its validation rules, the ports to the
//! object store and the product store, and the intake pipeline that ties
//! them together.
//!
//! One intake run is a linear pipeline:
//!  1. `validate_form`: check the raw form fields, collecting per-field errors.
//!  2. `upload_images`: upload each received file, sequentially, in order.
//!  3. `build_record`: assemble a `NewProduct` with the returned URLs.
//!  4. `persist_record`: hand it to the `ProductStore`.
//!
//! A failure at any step aborts the run. Uploads already made are not undone.

pub mod error;
pub mod intake;
pub mod memory;
pub mod pipeline;
pub mod ports;
pub mod product;
pub mod validation;

pub use crate::error::{IntakeError, IntakeResult, PipelineError};
pub use crate::intake::{IntakeFiles, IntakeService};
pub use crate::memory::{InMemoryProductStore, InMemoryUploader};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::ports::{ImageUploader, ProductStore, StoreError, UploadError, UploadedImage};
pub use crate::product::{NewProduct, Product, ProductStatus, Unit};
pub use crate::validation::{FieldErrors, ImageSet, ProductForm};
