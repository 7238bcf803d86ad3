//! HedgeCalculator Library
//!
//! Exit and hedge strategy calculations for binary prediction-market
//! positions, with quote resolution for Kalshi and Polymarket markets.

pub mod common;
pub mod config;
pub mod market;
pub mod report;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{HedgeError, HedgeUnavailable, Result};
pub use common::types::{Platform, Side, TradeAction};
pub use config::types::AppConfig;
pub use market::{parse_market_url, MarketResolver, ResolvedQuotes};

// Strategy types
pub use strategy::{
    FeeSchedule, HedgeCalculator, HedgeOutcome, Position, PositionSize, Quote, StrategyResult,
    StrategySet,
};
