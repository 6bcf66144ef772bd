//! Tradegraph Worker
//!
//! Runs analysis cycles for the configured strategies on a fixed interval and
//! persists the knowledge base after each cycle.

use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tradegraph::config::AppConfig;
use tradegraph::core::bootstrap::{build_orchestrator, open_knowledge_base};
use tradegraph::logging;
use tradegraph::metrics::Metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = AppConfig::from_env();
    info!("Starting Tradegraph Worker");
    info!(environment = %config.environment, "Environment");

    if config.worker_interval_seconds == 0 {
        return Err("WORKER_INTERVAL_SECONDS must be > 0 for worker".into());
    }
    if config.worker_strategies.is_empty() {
        warn!("No strategies configured - set WORKER_STRATEGIES to a comma separated list");
    }
    info!(
        interval = config.worker_interval_seconds,
        strategies = ?config.worker_strategies,
        "Analysis cycles every {} seconds", config.worker_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);
    let kb = open_knowledge_base(&config)?;
    let orchestrator = Arc::new(build_orchestrator(&config, kb, Some(metrics)));

    let strategies = config.worker_strategies.clone();
    let mut interval = tokio::time::interval(Duration::from_secs(config.worker_interval_seconds));

    info!("Worker started, waiting for shutdown signal...");
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutting down worker...");
                break;
            }
            _ = interval.tick() => {
                for strategy in &strategies {
                    let orchestrator = orchestrator.clone();
                    let id = strategy.clone();
                    match tokio::task::spawn_blocking(move || orchestrator.run_cycle(&id)).await {
                        Ok(Ok(report)) => info!(
                            strategy = %strategy,
                            action = %report.recommendation.action,
                            confidence = report.recommendation.confidence,
                            signals = report.signals.len(),
                            "Cycle finished"
                        ),
                        Ok(Err(e)) => warn!(
                            strategy = %strategy,
                            stage = %e.stage(),
                            error = %e,
                            "Cycle aborted"
                        ),
                        Err(e) => error!(strategy = %strategy, error = %e, "Cycle task failed"),
                    }
                }
            }
        }
    }

    info!("Worker stopped");
    Ok(())
}
