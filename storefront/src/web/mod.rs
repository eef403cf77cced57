// storefront/src/web/mod.rs

pub mod context;
pub mod forms;
pub mod handlers;
pub mod routes;

pub use context::RequestContext;
pub use routes::{configure_app_routes, json_config};
