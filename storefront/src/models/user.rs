// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered user. Users that own products are sellers.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing)]
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: String,
}
