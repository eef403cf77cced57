// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db;
use crate::errors::AppError;
use crate::models::Product;
use crate::repo::{cart_repo, product_repo};
use crate::state::AppState;
use crate::web::context::RequestContext;
use crate::web::forms::{AddCartItemPayload, FieldErrors, RemoveCartItemPayload, UpdateCartItemPayload};

#[instrument(name = "handler::list_cart", skip(app_state, ctx))]
pub async fn list_cart_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  let actor = ctx.require_actor()?;
  let items = cart_repo::list_for_user(&app_state.db_pool, actor.id).await?;

  info!("Fetched {} cart items for user {}.", items.len(), actor.id);
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::add_to_cart", skip(app_state, ctx, req_payload))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
  req_payload: web::Json<AddCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let actor = ctx.require_actor()?;
  let (product_id, quantity) = req_payload.validate().map_err(AppError::Validation)?;

  let mut tx = db::begin_write(&app_state.db_pool).await?;
  let product = product_repo::find_by_id(&mut *tx, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  ensure_in_stock(&product, quantity)?;

  // Adding a product already in the cart merges into the existing line.
  let item = match cart_repo::add_or_merge(&mut *tx, actor.id, product_id, quantity).await? {
    Some(item) => item,
    None => {
      warn!(
        "Merging {} of product {} into the cart of user {} would exceed stock of {}.",
        quantity, product_id, actor.id, product.quantity
      );
      return Err(out_of_stock(&product));
    }
  };
  tx.commit().await?;

  info!(
    "Cart item {} for user {} now holds {} of product {}.",
    item.id, actor.id, item.quantity, product_id
  );
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, ctx, req_payload))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
  req_payload: web::Json<UpdateCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let actor = ctx.require_actor()?;
  let (item_id, quantity) = req_payload.validate().map_err(AppError::Validation)?;

  let mut tx = db::begin_write(&app_state.db_pool).await?;
  let existing = cart_repo::find_for_user(&mut *tx, item_id, actor.id)
    .await?
    .ok_or_else(|| cart_item_not_found(item_id))?;
  let product = product_repo::find_by_id(&mut *tx, existing.product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(existing.product_id))?;
  ensure_in_stock(&product, quantity)?;

  let item = cart_repo::set_quantity(&mut *tx, item_id, quantity)
    .await?
    .ok_or_else(|| cart_item_not_found(item_id))?;
  tx.commit().await?;

  info!("Cart item {} for user {} set to {}.", item.id, actor.id, item.quantity);
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, ctx, req_payload))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
  req_payload: web::Json<RemoveCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let actor = ctx.require_actor()?;
  let item_id = req_payload.validate().map_err(AppError::Validation)?;

  if !cart_repo::delete_for_user(&app_state.db_pool, item_id, actor.id).await? {
    warn!("User {} tried to remove missing cart item {}.", actor.id, item_id);
    return Err(cart_item_not_found(item_id));
  }

  info!("Cart item {} removed for user {}.", item_id, actor.id);
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart" })))
}

fn cart_item_not_found(item_id: i64) -> AppError {
  AppError::NotFound(format!("Cart item with ID {} not found.", item_id))
}

fn out_of_stock(product: &Product) -> AppError {
  AppError::Validation(FieldErrors::single(
    "quantity",
    format!("Only {} left in stock.", product.quantity),
  ))
}

fn ensure_in_stock(product: &Product, requested: i64) -> Result<(), AppError> {
  if requested > product.quantity {
    warn!(
      "Insufficient stock for product {}. Available: {}, Requested: {}.",
      product.id, product.quantity, requested
    );
    return Err(out_of_stock(product));
  }
  Ok(())
}
