// core/src/validation.rs

//! Turns raw form fields into a `NewProduct`, collecting every rule violation
//! per field instead of stopping at the first one.
//!
//! Parsing (required, numeric, enum and integer checks) is done by hand; the
//! numeric and length bounds are declared on `FieldBounds` with `validator`.

use crate::product::{NewProduct, ProductStatus, Unit};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;

pub const MSG_NAME_REQUIRED: &str = "Please provide a name for this product";
pub const MSG_NAME_TOO_SHORT: &str = "Name must be at least 3 characters.";
pub const MSG_NAME_TOO_LONG: &str = "Name is too large";
pub const MSG_NAME_NOT_UNIQUE: &str = "Name must be unique";
pub const MSG_PRICE_NEGATIVE: &str = "Price can't be negative";
pub const MSG_QUANTITY_NEGATIVE: &str = "Quantity can't be negative";
pub const MSG_QUANTITY_NOT_INTEGER: &str = "Quantity must be an integer";

// Largest magnitude an f64 holds without losing integer precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Per-field validation failures, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  /// A single failure on a single field.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// Folds the output of a `validator` derive into this map.
  pub fn merge_validator(&mut self, errors: &ValidationErrors) {
    for (field, field_errors) in errors.field_errors() {
      for error in field_errors {
        let message = error
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| error.code.to_string());
        self.add(field.to_string(), message);
      }
    }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{}: {}", field, message)?;
        first = false;
      }
    }
    Ok(())
  }
}

/// Where the uploaded image URLs go on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSet {
  /// Single-image intake: sets `image`, leaves `multiple_images` empty.
  Single(String),
  /// Multi-image intake: sets `multiple_images` in attachment order.
  Multiple(Vec<String>),
}

/// Raw text fields as they arrive from the multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductForm {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<String>,
  pub unit: Option<String>,
  pub quantity: Option<String>,
  pub status: Option<String>,
}

impl ProductForm {
  /// Stores a text field by name. Returns `false` (and stores nothing) for
  /// fields the record does not know; those are ignored by the intake.
  pub fn set_field(&mut self, field: &str, value: String) -> bool {
    let slot = match field {
      "name" => &mut self.name,
      "description" => &mut self.description,
      "price" => &mut self.price,
      "unit" => &mut self.unit,
      "quantity" => &mut self.quantity,
      "status" => &mut self.status,
      _ => return false,
    };
    *slot = Some(value);
    true
  }

  /// Checks every field and builds the record candidate with the given images.
  pub fn validate(&self, images: ImageSet) -> Result<NewProduct, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = match self.name.as_deref().map(str::trim) {
      Some(n) if !n.is_empty() => Some(n.to_string()),
      _ => {
        errors.add("name", MSG_NAME_REQUIRED);
        None
      }
    };

    let description = match self.description.as_deref() {
      Some(d) if !d.is_empty() => Some(d.to_string()),
      _ => {
        errors.add("description", required_message("description"));
        None
      }
    };

    let price = parse_number("price", self.price.as_deref(), &mut errors);

    let unit = match non_blank(self.unit.as_deref()) {
      None => {
        errors.add("unit", required_message("unit"));
        None
      }
      Some(raw) => match raw.parse::<Unit>() {
        Ok(unit) => Some(unit),
        Err(_) => {
          errors.add("unit", format!("unit value can't be {}, must be kg/litre/pcs", raw));
          None
        }
      },
    };

    let quantity = parse_number("quantity", self.quantity.as_deref(), &mut errors).and_then(|q| {
      if q.abs() > MAX_SAFE_INTEGER {
        errors.add("quantity", "quantity is out of range");
        return None;
      }
      if q.fract() != 0.0 {
        errors.add("quantity", MSG_QUANTITY_NOT_INTEGER);
      }
      Some(q.trunc() as i64)
    });

    let status = match non_blank(self.status.as_deref()) {
      None => None,
      Some(raw) => match raw.parse::<ProductStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
          errors.add("status", format!("status can't be {}", raw));
          None
        }
      },
    };

    let bounds = FieldBounds {
      name: name.clone(),
      price,
      quantity,
    };
    if let Err(bound_errors) = bounds.validate() {
      errors.merge_validator(&bound_errors);
    }

    match (name, description, price, unit, quantity) {
      (Some(name), Some(description), Some(price), Some(unit), Some(quantity)) if errors.is_empty() => {
        let (image, multiple_images) = match images {
          ImageSet::Single(url) => (Some(url), Vec::new()),
          ImageSet::Multiple(urls) => (None, urls),
        };
        Ok(NewProduct {
          name,
          description,
          price,
          unit,
          quantity,
          status,
          image,
          multiple_images,
        })
      }
      _ => Err(errors),
    }
  }
}

/// Runs every form check without images. Lets the intake reject bad input
/// before anything is uploaded.
pub fn validate_form(form: &ProductForm) -> Result<(), FieldErrors> {
  form.validate(ImageSet::Multiple(Vec::new())).map(|_| ())
}

/// Bounds on the values that parsed; `None` fields are not checked here.
#[derive(Debug, Validate)]
struct FieldBounds {
  #[validate(custom(function = "validate_name_length"))]
  name: Option<String>,
  #[validate(range(min = 0.0, message = "Price can't be negative"))]
  price: Option<f64>,
  #[validate(range(min = 0, message = "Quantity can't be negative"))]
  quantity: Option<i64>,
}

fn validate_name_length(name: &str) -> Result<(), ValidationError> {
  let chars = name.chars().count();
  let message = if chars < NAME_MIN_CHARS {
    MSG_NAME_TOO_SHORT
  } else if chars > NAME_MAX_CHARS {
    MSG_NAME_TOO_LONG
  } else {
    return Ok(());
  };
  let mut error = ValidationError::new("length");
  error.message = Some(Cow::Borrowed(message));
  Err(error)
}

fn present(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Enum values must match exactly; padding is only ignored for the blank check.
fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

fn required_message(field: &str) -> String {
  format!("{} is required", field)
}

fn parse_number(field: &str, raw: Option<&str>, errors: &mut FieldErrors) -> Option<f64> {
  let raw = match present(raw) {
    Some(raw) => raw,
    None => {
      errors.add(field, required_message(field));
      return None;
    }
  };
  match raw.parse::<f64>() {
    Ok(value) if value.is_finite() => Some(value),
    _ => {
      errors.add(field, format!("{} must be a number", field));
      None
    }
  }
}
