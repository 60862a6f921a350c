// Main entry point for the admin API server

use std::sync::Arc;
use std::time::Duration;

use admin_core::domains::auth::JwtService;
use admin_core::domains::scope::PostgresProjectAssetStore;
use admin_core::kernel::ServerDeps;
use admin_core::server::{build_app, AppState};
use admin_core::Config;
use anyhow::{Context, Result};
use sktai_client::{SktaiClient, SktaiClientOptions};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,admin_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SKTAI admin API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // SKTAI platform client
    let mut options = SktaiClientOptions::new(config.sktai_api_base_url.clone())
        .with_timeout(Duration::from_secs(config.sktai_timeout_secs));
    if let Some(token) = config.sktai_api_token.clone() {
        options = options.with_token(token);
    }
    let client = Arc::new(SktaiClient::new(options).context("Failed to create SKTAI client")?);
    tracing::info!(base_url = %client.base_url(), "SKTAI client ready");

    // Build application
    let deps = ServerDeps::from_client(client, Arc::new(PostgresProjectAssetStore::new(pool.clone())));
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());
    let state = AppState::new(pool, deps, jwt_service);
    let app = build_app(state, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
