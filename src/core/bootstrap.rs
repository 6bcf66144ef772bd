//! Opening the knowledge base and wiring the shared services

use std::sync::Arc;

use tracing::{info, warn};

use crate::analysis::{AnalysisOrchestrator, AnalysisSettings};
use crate::config::AppConfig;
use crate::graph::{KnowledgeBase, PersistenceError};
use crate::metrics::Metrics;
use crate::seed::install_sample_data;
use crate::services::{MarketDataProvider, SimulatedMarketDataProvider};
use crate::strategies::StrategyError;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("failed to install sample data: {0}")]
    Seed(#[from] StrategyError),
}

/// Loads the persisted store when present, otherwise the configured seed file,
/// otherwise the built-in sample data. An unreadable persisted store is
/// reported and replaced by the seed.
pub fn open_knowledge_base(config: &AppConfig) -> Result<Arc<KnowledgeBase>, BootstrapError> {
    if config.store_path.exists() {
        match KnowledgeBase::load(&config.store_path) {
            Ok(kb) => {
                info!(
                    path = %config.store_path.display(),
                    facts = kb.len(),
                    "Knowledge base loaded"
                );
                return Ok(Arc::new(kb));
            }
            Err(e) => {
                warn!(
                    path = %config.store_path.display(),
                    error = %e,
                    "Persisted knowledge base is unreadable, falling back to seed data"
                );
            }
        }
    }

    if let Some(seed_path) = &config.seed_path {
        let kb = KnowledgeBase::load(seed_path)?;
        info!(path = %seed_path.display(), facts = kb.len(), "Knowledge base seeded from file");
        return Ok(Arc::new(kb));
    }

    let kb = Arc::new(KnowledgeBase::new());
    install_sample_data(&kb)?;
    info!(facts = kb.len(), "Knowledge base seeded with built-in sample data");
    Ok(kb)
}

/// Market data source selected by the configuration.
pub fn market_data_provider(config: &AppConfig) -> Arc<dyn MarketDataProvider> {
    match config.market_data_seed {
        Some(seed) => {
            info!(seed, "Using seeded simulated market data");
            Arc::new(SimulatedMarketDataProvider::seeded(seed))
        }
        None => Arc::new(SimulatedMarketDataProvider::new()),
    }
}

pub fn build_orchestrator(
    config: &AppConfig,
    kb: Arc<KnowledgeBase>,
    metrics: Option<Arc<Metrics>>,
) -> AnalysisOrchestrator {
    let orchestrator =
        AnalysisOrchestrator::new(kb, market_data_provider(config), AnalysisSettings::from(config));
    match metrics {
        Some(metrics) => orchestrator.with_metrics(metrics),
        None => orchestrator,
    }
}
