// storefront/src/models/image.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Image {
  pub id: i64,
  pub product_id: i64,
  pub image_url: String,
  #[serde(skip_serializing)]
  pub created_at: DateTime<Utc>,
}
