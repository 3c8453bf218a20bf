// Main entry point for the dispatch server

use std::sync::Arc;

use anyhow::{Context, Result};
use dispatch_core::kernel::{start_scheduler, HttpPaymentGateway, ServerKernel};
use dispatch_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dispatch_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ride dispatch server");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let read_pool = match &config.database_replica_url {
        Some(url) => {
            tracing::info!("Connecting to read replica...");
            Some(
                PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await
                    .context("Failed to connect to read replica")?,
            )
        }
        None => None,
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let kernel = Arc::new(ServerKernel::new(
        pool,
        read_pool,
        config.status_cache_ttl,
        config.matching_candidate_pool,
        Arc::new(HttpPaymentGateway::new(config.payment_gateway_url.clone())),
    ));

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = start_scheduler(kernel.clone(), config.matching_interval)
        .await
        .context("Failed to start scheduled tasks")?;

    let app = build_app(kernel);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
