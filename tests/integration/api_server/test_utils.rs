//! Test utilities for API server integration tests

use axum_test::TestServer;
use std::sync::Arc;
use tradegraph::analysis::AnalysisOrchestrator;
use tradegraph::core::http::{create_router, AppState};
use tradegraph::graph::KnowledgeBase;
use tradegraph::metrics::Metrics;

use crate::test_utils::{decreasing_closes, seeded_kb, settings, static_provider};

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub kb: Arc<KnowledgeBase>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let kb = seeded_kb();
        let provider = static_provider(
            &decreasing_closes(100.0, 40),
            &decreasing_closes(60_000.0, 40),
        );
        let orchestrator = Arc::new(
            AnalysisOrchestrator::new(kb.clone(), Arc::new(provider), settings(None))
                .with_metrics(metrics.clone()),
        );
        let state = AppState::new(metrics.clone(), kb.clone(), orchestrator);

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            kb,
        }
    }
}
