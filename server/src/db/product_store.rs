// server/src/db/product_store.rs

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use catalog_core::{NewProduct, Product, ProductStatus, ProductStore, StoreError, Unit};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

const INSERT_PRODUCT_SQL: &str = r#"
  INSERT INTO products
    (id, name, description, price, unit, quantity, status, image, multiple_images, created_at, updated_at)
  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
  RETURNING id, name, description, price, unit, quantity, status, image, multiple_images, created_at, updated_at
"#;

/// Row shape of the `products` table; enums are stored as their wire strings.
#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  description: String,
  price: f64,
  unit: String,
  quantity: i64,
  status: Option<String>,
  image: Option<String>,
  multiple_images: Vec<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = anyhow::Error;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    let unit = row
      .unit
      .parse::<Unit>()
      .with_context(|| format!("stored product {} has an invalid unit", row.id))?;
    let status = row
      .status
      .as_deref()
      .map(str::parse::<ProductStatus>)
      .transpose()
      .with_context(|| format!("stored product {} has an invalid status", row.id))?;

    Ok(Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: row.price,
      unit,
      quantity: row.quantity,
      status,
      image: row.image,
      multiple_images: row.multiple_images,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

/// Unique violations (SQLSTATE 23505) become `DuplicateName`; anything else is a backend failure.
fn insert_error(err: sqlx::Error, name: &str) -> StoreError {
  match &err {
    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
      warn!("Duplicate product name rejected by the database.");
      StoreError::DuplicateName(name.to_string())
    }
    _ => {
      error!("Failed to insert product: {}", err);
      StoreError::Backend {
        source: anyhow!(err).context("inserting product"),
      }
    }
  }
}

/// `ProductStore` on Postgres. The UNIQUE constraint on `name` is the source
/// of truth for uniqueness, so concurrent creates cannot both win.
#[derive(Clone)]
pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates the `products` table if it does not exist yet.
  #[instrument(name = "PgProductStore::ensure_schema", skip(self))]
  pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
    info!("Product schema is in place.");
    Ok(())
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  #[instrument(name = "PgProductStore::create", skip(self, new_product), fields(name = %new_product.name))]
  async fn create(&self, new_product: NewProduct) -> Result<Product, StoreError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row: ProductRow = sqlx::query_as(INSERT_PRODUCT_SQL)
      .bind(id)
      .bind(&new_product.name)
      .bind(&new_product.description)
      .bind(new_product.price)
      .bind(new_product.unit.as_str())
      .bind(new_product.quantity)
      .bind(new_product.status.map(|s| s.as_str()))
      .bind(&new_product.image)
      .bind(&new_product.multiple_images)
      .bind(now)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| insert_error(e, &new_product.name))?;

    let product = Product::try_from(row).map_err(|source| StoreError::Backend { source })?;
    info!(product_id = %product.id, "Product inserted.");
    Ok(product)
  }

  async fn count(&self) -> Result<u64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
      .fetch_one(&self.pool)
      .await
      .map_err(|e| StoreError::Backend {
        source: anyhow!(e).context("counting products"),
      })?;
    Ok(count.max(0) as u64)
  }
}
