// storefront/src/db.rs

//! Pool bootstrap, embedded migrations and demo seeding.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{NewProduct, NewUser};
use crate::repo::{cart_repo, image_repo, product_repo, user_repo};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens the pool described by `config` and applies pending migrations.
#[instrument(name = "db::connect", skip(config))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(&config.database_url)
    .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(Duration::from_secs(5));

  let pool = SqlitePoolOptions::new()
    .max_connections(config.db_max_connections)
    .acquire_timeout(Duration::from_secs(5))
    .connect_with(options)
    .await
    .map_err(|e| {
      error!("Failed to connect to the database: {}", e);
      AppError::Sqlx(e)
    })?;

  run_migrations(&pool).await?;
  info!("Successfully connected to the database.");
  Ok(pool)
}

/// A single-connection in-memory pool with migrations applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .min_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect_with(options)
    .await?;

  run_migrations(&pool).await?;
  Ok(pool)
}

/// Opens a write transaction with `BEGIN IMMEDIATE`.
///
/// The write lock is taken up front, so a transaction that reads before it
/// writes waits out the busy timeout behind other writers instead of failing
/// with `database is locked` when its read lock cannot be upgraded.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
  let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
  Ok(tx)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
  MIGRATOR.run(pool).await.map_err(|e| {
    error!("Failed to apply database migrations: {}", e);
    AppError::Migrate(e)
  })?;
  info!("Database migrations applied.");
  Ok(())
}

/// Inserts demo users, products, images and a cart line when the store has no users yet.
///
/// Returns `false` without writing anything if users already exist.
#[instrument(name = "db::seed_demo_data", skip(pool))]
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool> {
  if user_repo::count(pool).await? > 0 {
    info!("Users already present, skipping demo seeding.");
    return Ok(false);
  }

  let now = Utc::now();
  let mut tx = begin_write(pool).await?;

  let demo = user_repo::insert(
    &mut *tx,
    &NewUser {
      username: "demo".to_string(),
      email: "demo@aa.io".to_string(),
    },
    now,
  )
  .await?;
  let marnie = user_repo::insert(
    &mut *tx,
    &NewUser {
      username: "marnie".to_string(),
      email: "marnie@aa.io".to_string(),
    },
    now,
  )
  .await?;

  let catalog = [
    ("Walnut Desk Organizer", "Hand-finished walnut organizer with three compartments.", 45.0, 12, "https://images.example.com/organizer.jpg"),
    ("Ceramic Pour-Over Set", "Stoneware dripper and carafe, glazed in speckled white.", 38.5, 20, "https://images.example.com/pour-over.png"),
    ("Linen Throw Blanket", "Stonewashed linen throw, generously sized for the couch.", 79.99, 6, "https://images.example.com/throw.jpeg"),
  ];

  let mut first_product_id = None;
  for (name, description, price, quantity, image_url) in catalog {
    let product_id = product_repo::insert(
      &mut *tx,
      &NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price,
        quantity,
        seller_id: demo.id,
      },
      now,
    )
    .await?;
    image_repo::insert(&mut *tx, product_id, image_url, now).await?;
    first_product_id.get_or_insert(product_id);
  }

  if let Some(product_id) = first_product_id {
    cart_repo::insert(&mut *tx, marnie.id, product_id, 1).await?;
  }

  tx.commit().await?;
  info!("Demo data seeded.");
  Ok(true)
}
