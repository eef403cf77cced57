// storefront/src/lib.rs

//! Storefront backend: products, sellers, product images and shopping carts
//! served as JSON over actix-web, persisted in SQLite through sqlx.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod repo;
pub mod state;
pub mod web;

pub use config::{AppConfig, LogFormat};
pub use errors::{AppError, Result};
pub use state::AppState;
