use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use snip::config::Config;
use snip::{api, storage, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Arc::new(Config::from_env()?);

    // Initialize tracing
    telemetry::init_tracing(&config.logging)?;
    info!("Loaded configuration for {}", config.app_name);

    // Initialize storage
    info!(
        "Using {:?} storage: {}",
        config.database.backend, config.database.url
    );
    let storage = storage::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    info!("Initializing database...");
    storage.init().await.context("failed to initialize schema")?;
    info!("Database initialized successfully");

    let router = api::create_api_router(Arc::clone(&storage), Arc::clone(&config));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}{}", addr, config.server.api_prefix);

    axum::serve(listener, router).await?;

    Ok(())
}
