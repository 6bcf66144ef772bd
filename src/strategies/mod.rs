//! Strategy definitions and the reference data they point at.

pub mod catalog;
pub mod error;
pub mod resolver;

pub use catalog::{
    define_asset, define_indicator_config, define_market_pair, resolve_indicator_kind,
};
pub use error::{ConfigResolutionError, StrategyError};
pub use resolver::{StrategyDefinition, StrategyResolver};
