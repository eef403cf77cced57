// storefront/src/repo/product_repo.rs

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;
use tracing::debug;

use crate::errors::Result;
use crate::models::product::{NewProduct, Product, ProductChanges};

// The preview image is the product's lowest-id image.
const PRODUCT_COLUMNS: &str = "id, name, description, price, quantity, seller_id, created_at, updated_at,
  (SELECT images.image_url FROM images WHERE images.product_id = products.id ORDER BY images.id ASC LIMIT 1)
    AS image_url";

/// Every product, ordered by id. No paging.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Product>>
where
  E: SqliteExecutor<'e>,
{
  let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"))
    .fetch_all(executor)
    .await?;
  debug!(count = products.len(), "Listed all products.");
  Ok(products)
}

pub async fn find_by_id<'e, E>(executor: E, product_id: i64) -> Result<Option<Product>>
where
  E: SqliteExecutor<'e>,
{
  let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
    .bind(product_id)
    .fetch_optional(executor)
    .await?;
  Ok(product)
}

pub async fn list_by_seller<'e, E>(executor: E, seller_id: i64) -> Result<Vec<Product>>
where
  E: SqliteExecutor<'e>,
{
  let products = sqlx::query_as::<_, Product>(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = ?1 ORDER BY id ASC"
  ))
  .bind(seller_id)
  .fetch_all(executor)
  .await?;
  debug!(seller_id, count = products.len(), "Listed products by seller.");
  Ok(products)
}

/// Inserts a product and returns its id; `created_at` and `updated_at` both take `now`.
pub async fn insert<'e, E>(executor: E, new_product: &NewProduct, now: DateTime<Utc>) -> Result<i64>
where
  E: SqliteExecutor<'e>,
{
  let product_id = sqlx::query_scalar::<_, i64>(
    "INSERT INTO products (name, description, price, quantity, seller_id, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
     RETURNING id",
  )
  .bind(&new_product.name)
  .bind(&new_product.description)
  .bind(new_product.price)
  .bind(new_product.quantity)
  .bind(new_product.seller_id)
  .bind(now)
  .fetch_one(executor)
  .await?;
  debug!(product_id, seller_id = new_product.seller_id, "Inserted product.");
  Ok(product_id)
}

/// Overwrites the editable fields, the seller and `updated_at`. Returns `false` when no row matched.
pub async fn update<'e, E>(
  executor: E,
  product_id: i64,
  changes: &ProductChanges,
  seller_id: i64,
  now: DateTime<Utc>,
) -> Result<bool>
where
  E: SqliteExecutor<'e>,
{
  let result = sqlx::query(
    "UPDATE products
     SET name = ?1, description = ?2, price = ?3, quantity = ?4, seller_id = ?5, updated_at = ?6
     WHERE id = ?7",
  )
  .bind(&changes.name)
  .bind(&changes.description)
  .bind(changes.price)
  .bind(changes.quantity)
  .bind(seller_id)
  .bind(now)
  .bind(product_id)
  .execute(executor)
  .await?;
  Ok(result.rows_affected() > 0)
}

/// Deletes a product. Images and cart lines go with it (`ON DELETE CASCADE`).
pub async fn delete<'e, E>(executor: E, product_id: i64) -> Result<bool>
where
  E: SqliteExecutor<'e>,
{
  let result = sqlx::query("DELETE FROM products WHERE id = ?1")
    .bind(product_id)
    .execute(executor)
    .await?;
  Ok(result.rows_affected() > 0)
}
