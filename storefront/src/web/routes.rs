// storefront/src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// JSON extractor config that reports unparseable bodies as `AppError::MalformedBody`.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::MalformedBody(err.to_string()).into())
}

// Called in `main.rs` and by the integration tests to mount every route.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/products")
          .route("/", web::get().to(product_handlers::list_products_handler))
          .route("/", web::post().to(product_handlers::create_product_handler))
          .route(
            "/seller/{seller_id}",
            web::get().to(product_handlers::list_seller_products_handler),
          )
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler))
          .route(
            "/{product_id}/images",
            web::get().to(product_handlers::list_product_images_handler),
          ),
      )
      .service(
        web::scope("/shopping-cart")
          .route("/", web::get().to(cart_handlers::list_cart_handler))
          .route("/", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/", web::delete().to(cart_handlers::remove_from_cart_handler)),
      ),
  );
}
