// File: services/ashvault_backend/src/main.rs
use ashvault_backend::{build_router, AppState};
use ashvault_common::logging::{self, log_result};
use ashvault_common::{config_error, AshvaultError};
use ashvault_config::load_config;
use ashvault_reminders::start_scheduler;
use ashvault_store::StoreFactory;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _guard = logging::init();
    if let Err(e) = run().await {
        error!("Ashvault backend stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AshvaultError> {
    let config = Arc::new(log_result(
        load_config().map_err(config_error),
        "Configuration loaded",
        "Failed to load config",
    )?);

    let store = StoreFactory::new().from_config(&config.store)?;
    let state = AppState::new(config.clone(), store)?;
    let scheduler = start_scheduler(&config, state.job.clone())?;
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    log_result(served, "Server shut down cleanly", "Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
