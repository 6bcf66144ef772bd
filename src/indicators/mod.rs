//! Technical indicator library
//!
//! Every function takes a close series in ascending time order and returns
//! only the latest reading. Too little history yields `None`, never an error.

pub mod error;
pub mod registry;

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use error::IndicatorError;
pub use momentum::{calculate_macd, calculate_rsi};
pub use trend::calculate_sma;
pub use volatility::calculate_bollinger_bands;
