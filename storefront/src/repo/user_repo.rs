// storefront/src/repo/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::errors::Result;
use crate::models::user::{NewUser, User};

pub async fn find_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
  E: SqliteExecutor<'e>,
{
  let user = sqlx::query_as::<_, User>("SELECT id, username, email, created_at FROM users WHERE id = ?1")
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
  Ok(user)
}

pub async fn insert<'e, E>(executor: E, new_user: &NewUser, now: DateTime<Utc>) -> Result<User>
where
  E: SqliteExecutor<'e>,
{
  let user = sqlx::query_as::<_, User>(
    "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3)
     RETURNING id, username, email, created_at",
  )
  .bind(&new_user.username)
  .bind(&new_user.email)
  .bind(now)
  .fetch_one(executor)
  .await?;
  Ok(user)
}

pub async fn count<'e, E>(executor: E) -> Result<i64>
where
  E: SqliteExecutor<'e>,
{
  let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
    .fetch_one(executor)
    .await?;
  Ok(total)
}
