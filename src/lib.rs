//! Tradegraph: a semantic trading knowledge base with a repeatable analysis cycle.
//!
//! Strategies, market pairs, indicator configurations and every computed
//! reading, signal and recommendation live as facts in one graph. The analysis
//! orchestrator reads a strategy from that graph, computes indicators over
//! market data, interprets them into signals and records a recommendation.

pub mod analysis;
pub mod common;
pub mod config;
pub mod core;
pub mod graph;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod queries;
pub mod seed;
pub mod services;
pub mod signals;
pub mod strategies;
