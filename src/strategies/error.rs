use thiserror::Error;

use crate::graph::QueryError;
use crate::indicators::IndicatorError;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid identifier '{0}': must match [A-Za-z_][A-Za-z0-9_-]*")]
    InvalidIdentifier(String),
    #[error("{kind} '{id}' is not defined")]
    UnknownReference { kind: &'static str, id: String },
    #[error("invalid indicator parameters: {0}")]
    InvalidIndicator(#[from] IndicatorError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Why an indicator config could not be turned into an `IndicatorKind`.
#[derive(Debug, Error)]
pub enum ConfigResolutionError {
    #[error("indicator config {config} has no recognizable kind")]
    UnrecognizedKind { config: String },
    #[error("indicator config {config} is missing {parameter}")]
    MissingParameter {
        config: String,
        parameter: &'static str,
    },
    #[error("indicator config {config} has an invalid {parameter}: {reason}")]
    InvalidParameter {
        config: String,
        parameter: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Query(#[from] QueryError),
}
