// core/src/product.rs

//! The catalog's only entity and its closed enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A string that matched none of an enumeration's variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

/// Unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
  Kg,
  Litre,
  Pcs,
}

impl Unit {
  pub const ALL: [Unit; 3] = [Unit::Kg, Unit::Litre, Unit::Pcs];

  pub fn as_str(&self) -> &'static str {
    match self {
      Unit::Kg => "kg",
      Unit::Litre => "litre",
      Unit::Pcs => "pcs",
    }
  }
}

impl FromStr for Unit {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Unit::ALL
      .into_iter()
      .find(|u| u.as_str() == s)
      .ok_or_else(|| UnknownVariant(s.to_string()))
  }
}

impl fmt::Display for Unit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Stock status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
  InStock,
  OutOfStock,
  Discontinued,
}

impl ProductStatus {
  pub const ALL: [ProductStatus; 3] = [
    ProductStatus::InStock,
    ProductStatus::OutOfStock,
    ProductStatus::Discontinued,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductStatus::InStock => "in-stock",
      ProductStatus::OutOfStock => "out-of-stock",
      ProductStatus::Discontinued => "discontinued",
    }
  }
}

impl FromStr for ProductStatus {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProductStatus::ALL
      .into_iter()
      .find(|st| st.as_str() == s)
      .ok_or_else(|| UnknownVariant(s.to_string()))
  }
}

impl fmt::Display for ProductStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A validated product that has not been stored yet.
///
/// Only `ProductForm::validate` builds one, so every value here already
/// satisfies the record rules except name uniqueness, which the store checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub unit: Unit,
  pub quantity: i64,
  pub status: Option<ProductStatus>,
  pub image: Option<String>,
  pub multiple_images: Vec<String>,
}

/// A persisted product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: f64,
  pub unit: Unit,
  pub quantity: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<ProductStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default)]
  pub multiple_images: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Stamps a new record with its identity and creation time.
  pub fn from_new(new_product: NewProduct, id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id,
      name: new_product.name,
      description: new_product.description,
      price: new_product.price,
      unit: new_product.unit,
      quantity: new_product.quantity,
      status: new_product.status,
      image: new_product.image,
      multiple_images: new_product.multiple_images,
      created_at: now,
      updated_at: now,
    }
  }
}
