// core/src/intake/context.rs

//! Data carried through one intake pipeline run.

use crate::ports::UploadedImage;
use crate::product::{NewProduct, Product};
use crate::validation::{ImageSet, ProductForm};
use std::path::PathBuf;

/// Which intake variant is running, with the received local files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeFiles {
  /// Zero or more files, stored in `multipleImages` in this order.
  Multiple(Vec<PathBuf>),
  /// Exactly one file, stored in `image`.
  Single(PathBuf),
}

impl IntakeFiles {
  pub fn paths(&self) -> Vec<PathBuf> {
    match self {
      IntakeFiles::Multiple(paths) => paths.clone(),
      IntakeFiles::Single(path) => vec![path.clone()],
    }
  }
}

#[derive(Debug, Clone)]
pub struct IntakeCtxData {
  pub form: ProductForm,
  pub files: IntakeFiles,
  /// Filled by `upload_images`, in the same order as `files`.
  pub uploaded: Vec<UploadedImage>,
  /// Filled by `build_record`.
  pub new_product: Option<NewProduct>,
  /// Filled by `persist_record`.
  pub product: Option<Product>,
}

impl IntakeCtxData {
  pub fn new(form: ProductForm, files: IntakeFiles) -> Self {
    Self {
      form,
      files,
      uploaded: Vec::new(),
      new_product: None,
      product: None,
    }
  }

  pub fn uploaded_urls(&self) -> Vec<String> {
    self.uploaded.iter().map(|u| u.url.clone()).collect()
  }

  /// Places the uploaded URLs on the record according to the intake variant.
  pub fn image_set(&self) -> Option<ImageSet> {
    match self.files {
      IntakeFiles::Multiple(_) => Some(ImageSet::Multiple(self.uploaded_urls())),
      IntakeFiles::Single(_) => self.uploaded.first().map(|u| ImageSet::Single(u.url.clone())),
    }
  }
}
