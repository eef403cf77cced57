// storefront/src/repo/mod.rs

//! Data access operations, one module per entity.
//!
//! Every operation is generic over [`sqlx::SqliteExecutor`], so the same call
//! works against the pool for reads and against `&mut *tx` inside a handler's
//! transaction for writes. Absence is reported as `Option`/`bool`; turning it
//! into `AppError::NotFound` is the caller's decision.

pub mod cart_repo;
pub mod image_repo;
pub mod product_repo;
pub mod user_repo;
