// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers

use std::path::Path;

use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use storefront::config::AppConfig;
use storefront::db;
use storefront::models::{NewProduct, NewUser, Product, User};
use storefront::repo::{product_repo, user_repo};
use storefront::state::AppState;
use tracing::Level;

pub const CSRF: &str = "csrf-test-token";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Builds the real route table over `$state` and initializes it as a test service.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .app_data(storefront::web::json_config())
        .configure(storefront::web::configure_app_routes),
    )
    .await
  };
}

pub async fn test_state(enforce_seller_ownership: bool) -> AppState {
  setup_tracing();
  let pool = db::connect_in_memory().await.expect("in-memory pool should open");
  let config = AppConfig::from_lookup(|key| match key {
    "DATABASE_URL" => Some("sqlite::memory:".to_string()),
    "ENFORCE_SELLER_OWNERSHIP" => Some(enforce_seller_ownership.to_string()),
    _ => None,
  })
  .expect("test config should parse");
  AppState::new(pool, config)
}

/// State over a SQLite file in `dir`, pooled across several connections.
pub async fn file_backed_state(dir: &Path) -> AppState {
  setup_tracing();
  let database_url = format!("sqlite://{}", dir.join("storefront.db").display());
  let config = AppConfig::from_lookup(|key| match key {
    "DATABASE_URL" => Some(database_url.clone()),
    "DB_MAX_CONNECTIONS" => Some("4".to_string()),
    _ => None,
  })
  .expect("test config should parse");
  let pool = db::connect(&config).await.expect("file-backed pool should open");
  AppState::new(pool, config)
}

pub async fn create_user(state: &AppState, username: &str) -> User {
  user_repo::insert(
    &state.db_pool,
    &NewUser {
      username: username.to_string(),
      email: format!("{}@example.com", username),
    },
    Utc::now(),
  )
  .await
  .expect("user insert should succeed")
}

pub async fn create_product(state: &AppState, seller: &User, name: &str, quantity: i64) -> Product {
  let product_id = product_repo::insert(
    &state.db_pool,
    &NewProduct {
      name: name.to_string(),
      description: format!("{} described in more than twenty characters.", name),
      price: 25.0,
      quantity,
      seller_id: seller.id,
    },
    Utc::now(),
  )
  .await
  .expect("product insert should succeed");
  stored_product(state, product_id)
    .await
    .expect("inserted product should be readable")
}

pub async fn stored_product(state: &AppState, product_id: i64) -> Option<Product> {
  product_repo::find_by_id(&state.db_pool, product_id)
    .await
    .expect("product lookup should succeed")
}

pub fn product_form() -> Value {
  json!({
    "name": "Hand-thrown Mug",
    "description": "Stoneware mug glazed in a deep ocean blue.",
    "price": 32.5,
    "quantity": 9,
    "image_url": "https://img.example.com/mug.png",
    "csrf_token": CSRF
  })
}
