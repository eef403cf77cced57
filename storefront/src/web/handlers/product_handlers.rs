// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db;
use crate::errors::AppError;
use crate::models::{NewProduct, Product, ProductWithSeller, User};
use crate::repo::{image_repo, product_repo, user_repo};
use crate::state::AppState;
use crate::web::context::RequestContext;
use crate::web::forms::ProductForm;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = product_repo::list_all(&app_state.db_pool).await?;

  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product = product_repo::find_by_id(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  let seller = user_repo::find_by_id(&app_state.db_pool, product.seller_id)
    .await?
    .ok_or_else(|| AppError::user_not_found(product.seller_id))?;

  info!("Product {} fetched with seller {}.", product.id, seller.id);
  let product_with_seller = ProductWithSeller { product, seller };
  Ok(HttpResponse::Ok().json(json!({ "product": product_with_seller })))
}

#[instrument(name = "handler::list_seller_products", skip(app_state, path), fields(seller_id = %path.as_ref()))]
pub async fn list_seller_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let seller_id = path.into_inner();

  let seller = user_repo::find_by_id(&app_state.db_pool, seller_id)
    .await?
    .ok_or_else(|| AppError::user_not_found(seller_id))?;
  let products = product_repo::list_by_seller(&app_state.db_pool, seller_id).await?;

  info!("Fetched {} products for seller {}.", products.len(), seller_id);
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "seller": seller
  })))
}

#[instrument(name = "handler::list_product_images", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn list_product_images_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  if product_repo::find_by_id(&app_state.db_pool, product_id).await?.is_none() {
    return Err(AppError::product_not_found(product_id));
  }
  let images = image_repo::list_for_product(&app_state.db_pool, product_id).await?;

  Ok(HttpResponse::Ok().json(json!({ "images": images })))
}

#[instrument(name = "handler::create_product", skip(app_state, ctx, form))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
  form: web::Json<ProductForm>,
) -> Result<HttpResponse, AppError> {
  let actor = ctx.require_actor()?;
  let valid = form.validate(ctx.csrf_cookie.as_deref(), true).map_err(|errors| {
    warn!("Product creation by user {} failed validation: {}", actor.id, errors);
    AppError::Validation(errors)
  })?;

  let now = Utc::now();
  let new_product = NewProduct {
    name: valid.changes.name,
    description: valid.changes.description,
    price: valid.changes.price,
    quantity: valid.changes.quantity,
    seller_id: actor.id,
  };

  let mut tx = db::begin_write(&app_state.db_pool).await?;
  let product_id = product_repo::insert(&mut *tx, &new_product, now).await?;
  if let Some(image_url) = valid.image_url.as_deref() {
    image_repo::insert(&mut *tx, product_id, image_url, now).await?;
  }
  let product = product_repo::find_by_id(&mut *tx, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  tx.commit().await?;

  info!("Product {} created by seller {}.", product.id, actor.id);
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, path, ctx, form), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  ctx: RequestContext,
  form: web::Json<ProductForm>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let actor = ctx.require_actor()?;
  let valid = form.validate(ctx.csrf_cookie.as_deref(), false).map_err(|errors| {
    warn!("Update of product {} by user {} failed validation: {}", product_id, actor.id, errors);
    AppError::Validation(errors)
  })?;

  let mut tx = db::begin_write(&app_state.db_pool).await?;
  let existing = product_repo::find_by_id(&mut *tx, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  ensure_can_modify(&app_state, actor, &existing)?;

  // The updating actor becomes the product's seller.
  let now = Utc::now();
  if !product_repo::update(&mut *tx, product_id, &valid.changes, actor.id, now).await? {
    return Err(AppError::product_not_found(product_id));
  }
  if let Some(image_url) = valid.image_url.as_deref() {
    image_repo::insert(&mut *tx, product_id, image_url, now).await?;
  }
  let updated = product_repo::find_by_id(&mut *tx, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  tx.commit().await?;

  if existing.seller_id != updated.seller_id {
    info!(
      "Product {} reassigned from seller {} to {}.",
      product_id, existing.seller_id, updated.seller_id
    );
  }
  info!("Product {} updated by user {}.", product_id, actor.id);
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(name = "handler::delete_product", skip(app_state, path, ctx), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let actor = ctx.require_actor()?;

  let mut tx = db::begin_write(&app_state.db_pool).await?;
  let existing = product_repo::find_by_id(&mut *tx, product_id)
    .await?
    .ok_or_else(|| AppError::product_not_found(product_id))?;
  ensure_can_modify(&app_state, actor, &existing)?;

  if !product_repo::delete(&mut *tx, product_id).await? {
    return Err(AppError::product_not_found(product_id));
  }
  tx.commit().await?;

  info!("Product {} deleted by user {}.", product_id, actor.id);
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted" })))
}

/// Rejects non-sellers when seller-ownership enforcement is enabled.
fn ensure_can_modify(app_state: &AppState, actor: &User, product: &Product) -> Result<(), AppError> {
  if app_state.config.enforce_seller_ownership && product.seller_id != actor.id {
    warn!(
      "User {} attempted to modify product {} owned by seller {}.",
      actor.id, product.id, product.seller_id
    );
    return Err(AppError::Forbidden(format!(
      "Only the seller may modify product {}.",
      product.id
    )));
  }
  Ok(())
}
