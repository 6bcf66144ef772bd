//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use super::bootstrap::{build_orchestrator, open_knowledge_base};
use crate::analysis::{AnalysisOrchestrator, CycleError, CycleReport};
use crate::config::AppConfig;
use crate::graph::KnowledgeBase;
use crate::metrics::Metrics;
use crate::models::strategy::{RiskLevel, StrategyRecord, TimeHorizon};
use crate::queries::{pair_dashboard, pair_exists, PairDashboard};
use crate::strategies::{StrategyDefinition, StrategyError, StrategyResolver};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub kb: Arc<KnowledgeBase>,
    pub resolver: Arc<StrategyResolver>,
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        kb: Arc<KnowledgeBase>,
        orchestrator: Arc<AnalysisOrchestrator>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            resolver: Arc::new(StrategyResolver::new(kb.clone())),
            kb,
            orchestrator,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error response with a `{"error": "..."}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CycleError> for ApiError {
    fn from(e: CycleError) -> Self {
        let status = match &e {
            CycleError::StrategyNotFound(_) => StatusCode::NOT_FOUND,
            CycleError::AlreadyRunning(_) => StatusCode::CONFLICT,
            CycleError::MarketDataUnavailable { .. }
            | CycleError::MarketData { .. }
            | CycleError::InvalidMarketData { .. } => StatusCode::BAD_GATEWAY,
            CycleError::Query { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<StrategyError> for ApiError {
    fn from(e: StrategyError) -> Self {
        let status = match &e {
            StrategyError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.to_string())
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "knowledge_base_facts": state.kb.len(),
        "service": "tradegraph"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.knowledge_base_facts.set(state.kb.len() as f64);
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct UpsertStrategyRequest {
    pub display_name: String,
    pub market_pair: String,
    #[serde(default)]
    pub indicator_configs: Vec<String>,
    pub risk_level: Option<RiskLevel>,
    pub horizon: Option<TimeHorizon>,
}

/// Quote, latest indicator readings and latest recommendation for a pair
async fn get_pair_dashboard(
    State(state): State<AppState>,
    Path(pair): Path<String>,
) -> Result<Json<PairDashboard>, ApiError> {
    if !pair_exists(&state.kb, &pair) {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("market pair '{pair}' not found"),
        ));
    }
    let dashboard = pair_dashboard(&state.kb, &pair).map_err(|e| {
        error!(error = %e, pair = %pair, "Failed to build dashboard");
        ApiError::internal(e.to_string())
    })?;
    Ok(Json(dashboard))
}

async fn get_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StrategyRecord>, ApiError> {
    let record = state.resolver.get_active_strategy(&id).map_err(|e| {
        error!(error = %e, strategy = %id, "Failed to load strategy");
        ApiError::internal(e.to_string())
    })?;
    record
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("strategy '{id}' not found")))
}

/// Create or replace a strategy definition
async fn put_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpsertStrategyRequest>,
) -> Result<Json<StrategyRecord>, ApiError> {
    let definition = StrategyDefinition::new(&id, &request.display_name, &request.market_pair)
        .with_indicator_configs(request.indicator_configs)
        .with_risk_level(request.risk_level.unwrap_or_default())
        .with_horizon(request.horizon.unwrap_or_default());

    state.resolver.define_or_update_strategy(&definition)?;

    let record = state
        .resolver
        .get_active_strategy(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    record.map(Json).ok_or_else(|| {
        ApiError::internal(format!("strategy '{id}' could not be read back after writing"))
    })
}

/// Run one analysis cycle for a strategy
async fn run_cycle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CycleReport>, ApiError> {
    let orchestrator = state.orchestrator.clone();
    let strategy = id.clone();
    let report = tokio::task::spawn_blocking(move || orchestrator.run_cycle(&strategy))
        .await
        .map_err(|e| {
            error!(error = %e, strategy = %id, "Analysis cycle task failed");
            ApiError::internal("analysis cycle task failed")
        })??;
    Ok(Json(report))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/pairs/{pair}/dashboard", get(get_pair_dashboard))
        .route("/api/strategies/{id}", get(get_strategy).put(put_strategy))
        .route("/api/strategies/{id}/cycles", post(run_cycle))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let kb = open_knowledge_base(&config)?;
    metrics.knowledge_base_facts.set(kb.len() as f64);

    let orchestrator = Arc::new(build_orchestrator(
        &config,
        kb.clone(),
        Some(metrics.clone()),
    ));
    let state = AppState::new(metrics, kb, orchestrator);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
