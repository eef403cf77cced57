// storefront/src/repo/image_repo.rs

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::errors::Result;
use crate::models::image::Image;

pub async fn insert<'e, E>(executor: E, product_id: i64, image_url: &str, now: DateTime<Utc>) -> Result<Image>
where
  E: SqliteExecutor<'e>,
{
  let image = sqlx::query_as::<_, Image>(
    "INSERT INTO images (product_id, image_url, created_at) VALUES (?1, ?2, ?3)
     RETURNING id, product_id, image_url, created_at",
  )
  .bind(product_id)
  .bind(image_url)
  .bind(now)
  .fetch_one(executor)
  .await?;
  Ok(image)
}

pub async fn list_for_product<'e, E>(executor: E, product_id: i64) -> Result<Vec<Image>>
where
  E: SqliteExecutor<'e>,
{
  let images = sqlx::query_as::<_, Image>(
    "SELECT id, product_id, image_url, created_at FROM images WHERE product_id = ?1 ORDER BY id ASC",
  )
  .bind(product_id)
  .fetch_all(executor)
  .await?;
  Ok(images)
}
