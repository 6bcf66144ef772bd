//! Application wiring: knowledge base bootstrap and the HTTP surface

pub mod bootstrap;
pub mod http;

pub use bootstrap::{build_orchestrator, market_data_provider, open_knowledge_base, BootstrapError};
pub use http::{create_router, start_server, AppState, HealthStatus};
