// core/src/ports/mod.rs

//! The two external collaborators of the intake: remote image storage and the
//! product store. Both are injected as `Arc<dyn ...>` and shared by all requests.

pub mod store;
pub mod uploader;

pub use store::{ProductStore, StoreError};
pub use uploader::{ImageUploader, UploadError, UploadedImage};
