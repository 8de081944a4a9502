use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use url_classifier_backend::{
    app_config, build_router, initialize_app_state, services::spawn_allowlist_refresher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "url_classifier_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = app_config::AppConfig::from_env().context("Invalid configuration")?;
    info!(
        "Starting URL classifier backend on {} ({})",
        config.server.bind_address, config.environment
    );

    let state = initialize_app_state(&config).await.with_context(|| {
        format!(
            "Failed to load model artifacts (model: {}, scaler: {})",
            config.model.model_path, config.model.scaler_path
        )
    })?;

    spawn_allowlist_refresher(state.allowlist.clone());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!("Listening on {}", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
