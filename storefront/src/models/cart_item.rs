// storefront/src/models/cart_item.rs

use serde::Serialize;
use sqlx::FromRow;

/// One line of a user's cart. At most one line exists per (user, product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartItem {
  pub id: i64,
  pub product_id: i64,
  pub user_id: i64,
  pub quantity: i64,
}
