//! Tradegraph API Server
//!
//! HTTP API over the knowledge base: pair dashboards, strategy definitions
//! and on-demand analysis cycles.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tradegraph::config::AppConfig;
use tradegraph::core::http::start_server;
use tradegraph::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = AppConfig::from_env();
    let port = config.port;
    info!("Starting Tradegraph API Server");
    info!(environment = %config.environment, "Environment");
    info!(store = %config.store_path.display(), "Knowledge base store");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
