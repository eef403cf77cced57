// storefront/src/web/context.rs

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::repo::user_repo;
use crate::state::AppState;

/// Header carrying the caller's user id, set by the upstream authentication layer.
pub const USER_ID_HEADER: &str = "X-User-ID";
pub const CSRF_COOKIE: &str = "csrf_token";

/// Per-request view of who is calling.
///
/// Handlers receive this explicitly instead of reading an ambient "current user".
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
  pub actor: Option<User>,
  pub csrf_cookie: Option<String>,
}

impl RequestContext {
  /// The authenticated caller, or `AppError::Unauthorized`.
  pub fn require_actor(&self) -> Result<&User, AppError> {
    self.actor.as_ref().ok_or(AppError::Unauthorized)
  }
}

impl FromRequest for RequestContext {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let claimed_user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.trim().parse::<i64>().ok());
    let csrf_cookie = req
      .cookie(CSRF_COOKIE)
      .map(|cookie| cookie.value().to_string())
      .filter(|value| !value.is_empty());
    let db_pool = req.app_data::<web::Data<AppState>>().map(|state| state.db_pool.clone());

    Box::pin(async move {
      let actor = match (claimed_user_id, db_pool) {
        (Some(user_id), Some(pool)) => {
          let user = user_repo::find_by_id(&pool, user_id).await?;
          if user.is_none() {
            warn!(user_id, "{} names an unknown user; treating caller as anonymous.", USER_ID_HEADER);
          }
          user
        }
        (Some(_), None) => {
          warn!("AppState missing from app data; cannot resolve caller.");
          None
        }
        (None, _) => None,
      };

      debug!(authenticated = actor.is_some(), "Request context resolved.");
      Ok(RequestContext { actor, csrf_cookie })
    })
  }
}
