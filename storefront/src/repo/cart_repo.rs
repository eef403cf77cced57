// storefront/src/repo/cart_repo.rs

use sqlx::SqliteExecutor;

use crate::errors::Result;
use crate::models::cart_item::CartItem;

const CART_ITEM_COLUMNS: &str = "id, product_id, user_id, quantity";

pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<CartItem>>
where
  E: SqliteExecutor<'e>,
{
  let items = sqlx::query_as::<_, CartItem>(&format!(
    "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE user_id = ?1 ORDER BY id ASC"
  ))
  .bind(user_id)
  .fetch_all(executor)
  .await?;
  Ok(items)
}

/// Looks a line up by id, but only within the given user's cart.
pub async fn find_for_user<'e, E>(executor: E, item_id: i64, user_id: i64) -> Result<Option<CartItem>>
where
  E: SqliteExecutor<'e>,
{
  let item = sqlx::query_as::<_, CartItem>(&format!(
    "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE id = ?1 AND user_id = ?2"
  ))
  .bind(item_id)
  .bind(user_id)
  .fetch_optional(executor)
  .await?;
  Ok(item)
}

/// Adds `quantity` of a product to the user's cart in one statement.
///
/// A new line is inserted, or the existing (user, product) line grows by
/// `quantity`. Returns `None` when the product is absent or the resulting line
/// would exceed its stock; nothing is written in that case. SQLite turns an
/// overflowing integer sum into a REAL, which then fails the stock comparison.
pub async fn add_or_merge<'e, E>(executor: E, user_id: i64, product_id: i64, quantity: i64) -> Result<Option<CartItem>>
where
  E: SqliteExecutor<'e>,
{
  let item = sqlx::query_as::<_, CartItem>(&format!(
    "INSERT INTO cart_items (product_id, user_id, quantity)
     SELECT products.id, ?2, ?3 FROM products WHERE products.id = ?1 AND products.quantity >= ?3
     ON CONFLICT (user_id, product_id) DO UPDATE
       SET quantity = cart_items.quantity + excluded.quantity
       WHERE cart_items.quantity + excluded.quantity
         <= (SELECT products.quantity FROM products WHERE products.id = excluded.product_id)
     RETURNING {CART_ITEM_COLUMNS}"
  ))
  .bind(product_id)
  .bind(user_id)
  .bind(quantity)
  .fetch_optional(executor)
  .await?;
  Ok(item)
}

pub async fn insert<'e, E>(executor: E, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem>
where
  E: SqliteExecutor<'e>,
{
  let item = sqlx::query_as::<_, CartItem>(&format!(
    "INSERT INTO cart_items (product_id, user_id, quantity) VALUES (?1, ?2, ?3)
     RETURNING {CART_ITEM_COLUMNS}"
  ))
  .bind(product_id)
  .bind(user_id)
  .bind(quantity)
  .fetch_one(executor)
  .await?;
  Ok(item)
}

pub async fn set_quantity<'e, E>(executor: E, item_id: i64, quantity: i64) -> Result<Option<CartItem>>
where
  E: SqliteExecutor<'e>,
{
  let item = sqlx::query_as::<_, CartItem>(&format!(
    "UPDATE cart_items SET quantity = ?1 WHERE id = ?2 RETURNING {CART_ITEM_COLUMNS}"
  ))
  .bind(quantity)
  .bind(item_id)
  .fetch_optional(executor)
  .await?;
  Ok(item)
}

pub async fn delete_for_user<'e, E>(executor: E, item_id: i64, user_id: i64) -> Result<bool>
where
  E: SqliteExecutor<'e>,
{
  let result = sqlx::query("DELETE FROM cart_items WHERE id = ?1 AND user_id = ?2")
    .bind(item_id)
    .bind(user_id)
    .execute(executor)
    .await?;
  Ok(result.rows_affected() > 0)
}
