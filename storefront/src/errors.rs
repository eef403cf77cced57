// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::web::forms::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
  /// The caller is not authenticated.
  #[error("Unauthorized")]
  Unauthorized,

  /// The caller is authenticated but may not touch this resource.
  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Validation Error: {0}")]
  Validation(FieldErrors),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Malformed Request Body: {0}")]
  MalformedBody(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
  pub fn product_not_found(product_id: i64) -> Self {
    AppError::NotFound(format!("Product with ID {} not found.", product_id))
  }

  pub fn user_not_found(user_id: i64) -> Self {
    AppError::NotFound(format!("User with ID {} not found.", user_id))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      // Unauthenticated callers get 403 and invalid forms get 401. Clients already depend on both.
      AppError::Unauthorized | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Validation(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }

    let body = match self {
      AppError::Unauthorized => json!({"errors": "Unauthorized"}),
      AppError::Forbidden(m) | AppError::NotFound(m) | AppError::MalformedBody(m) => json!({"errors": m}),
      AppError::Validation(field_errors) => json!({"errors": field_errors}),
      AppError::Config(_) => json!({"errors": "Configuration issue"}),
      AppError::Sqlx(_) | AppError::Migrate(_) => json!({"errors": "Database operation failed"}),
    };
    HttpResponse::build(status).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[test]
  fn status_codes_follow_client_contract() {
    assert_eq!(AppError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
      AppError::Forbidden("not yours".to_string()).status_code(),
      StatusCode::FORBIDDEN
    );
    assert_eq!(
      AppError::Validation(FieldErrors::default()).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(AppError::product_not_found(7).status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
      AppError::Sqlx(sqlx::Error::RowNotFound).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[actix_web::test]
  async fn validation_error_body_lists_fields() {
    let mut field_errors = FieldErrors::default();
    field_errors.add("name", "This field is required.");

    let response = AppError::Validation(field_errors).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(value["errors"]["name"][0], "This field is required.");
  }

  #[actix_web::test]
  async fn database_errors_do_not_leak_detail() {
    let response = AppError::Sqlx(sqlx::Error::PoolTimedOut).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(value["errors"], "Database operation failed");
  }
}
