// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub price: f64,
  pub quantity: i64,
  pub seller_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// URL of the product's first image, if it has one.
  pub image_url: Option<String>,
}

/// A product with its seller's record embedded under `seller`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithSeller {
  #[serde(flatten)]
  pub product: Product,
  pub seller: User,
}

/// Fields of a product about to be inserted. Timestamps are stamped by the repository.
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub quantity: i64,
  pub seller_id: i64,
}

/// The overwritable fields of an existing product.
#[derive(Debug, Clone)]
pub struct ProductChanges {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub quantity: i64,
}
