// storefront/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  /// Seed demo users and products on startup when the store is empty.
  pub seed_db: bool,

  /// When set, only a product's seller may update or delete it.
  pub enforce_seller_ownership: bool,

  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let config = Self::from_lookup(|var_name| env::var(var_name).ok())?;
    tracing::info!("Application configuration loaded successfully.");
    Ok(config)
  }

  /// Builds the config from any key/value source. Missing optional keys fall back to defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = lookup("DATABASE_URL")
      .filter(|url| !url.trim().is_empty())
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let db_max_connections = get_or("DB_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    let seed_db = get_or("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;
    let enforce_seller_ownership = get_or("ENFORCE_SELLER_OWNERSHIP", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid ENFORCE_SELLER_OWNERSHIP value: {}", e)))?;

    let log_format = match get_or("LOG_FORMAT", "text").trim().to_ascii_lowercase().as_str() {
      "text" => LogFormat::Text,
      "json" => LogFormat::Json,
      other => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT `{}`; expected text|json",
          other
        )))
      }
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      seed_db,
      enforce_seller_ownership,
      log_format,
    })
  }
}
