// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

use storefront::config::{AppConfig, LogFormat};
use storefront::state::AppState;
use storefront::{db, web};

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into()) // Default level
    .from_env_lossy(); // Allow RUST_LOG override
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match format {
    LogFormat::Text => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");

  let db_pool = db::connect(&app_config).await.context("Failed to initialize the database")?;

  if app_config.seed_db {
    db::seed_demo_data(&db_pool).await.context("Failed to seed database")?;
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(db_pool, app_config);

  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .app_data(web::json_config())
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
