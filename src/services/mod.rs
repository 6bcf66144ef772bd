//! External collaborators consumed by the analysis cycle.

pub mod market_data;

pub use market_data::{
    MarketDataError, MarketDataProvider, SimulatedMarketDataProvider, StaticMarketDataProvider,
};
