//! Strategy module for exit and hedge calculations
//!
//! This module turns a position, the live quotes for its market and the
//! complementary market, and a fee schedule into a fixed set of strategies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ASYNC (boundary)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MarketResolver (crate::market)                             │
//! │    - Parses the market URL                                  │
//! │    - Fetches quotes for the held and opposite markets       │
//! │    - Attaches the fee schedule                              │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ENGINE (sync, pure)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Position::validate()                                       │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  HedgeCalculator                                            │
//! │    - exit            → StrategyResult                       │
//! │    - perfect_hedge   → HedgeOutcome                         │
//! │    - partial_hedge(%) → HedgeOutcome                        │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ranking::recommend → StrategySet                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`HedgeCalculator`]: The engine; holds only advisory settings
//! - [`FeeSchedule`]: Maker/taker/transaction rates applied per trade leg
//! - [`Position`] / [`PositionSize`]: Validated holding and its sizing forms
//! - [`StrategySet`]: Exit, perfect hedge, partial hedges and the recommendation
//!
//! # Example
//!
//! ```
//! use hedge_calculator::strategy::{FeeSchedule, HedgeCalculator, Position, Quote};
//! use hedge_calculator::Side;
//! use rust_decimal_macros::dec;
//!
//! let position = Position::new(Side::Yes, dec!(100), dec!(0.46)).unwrap();
//! let quote = Quote::new(dec!(0.56), dec!(0.54), dec!(0.46), dec!(0.44));
//! let opposite = Quote::new(dec!(0.55), dec!(0.53), dec!(0.47), dec!(0.45));
//! let fees = FeeSchedule::new(dec!(0.02), dec!(0.05), dec!(0.01));
//!
//! let strategies = HedgeCalculator::new()
//!     .compute_strategies(&position, &quote, Some(&opposite), &fees)
//!     .unwrap();
//! assert_eq!(strategies.exit.profit, dec!(4.76));
//! ```

mod types;
mod calculator;
mod fees;
pub mod ranking;
pub mod sizing;

pub use types::{
    HedgeOutcome,
    HedgeWarning,
    MarketLeg,
    PartialHedgeEntry,
    PartialTier,
    Position,
    Quote,
    RiskLevel,
    StrategyContext,
    StrategyKind,
    StrategyResult,
    StrategySet,
    TradeLeg,
    MAX_BUY_PRICE,
    MAX_SHARES,
    MIN_BUY_PRICE,
};

pub use calculator::{HedgeCalculator, DEFAULT_SPREAD_WARNING_THRESHOLD, PROFIT_TOLERANCE};

pub use fees::{FeeBreakdown, FeeSchedule, FeeSource};

pub use sizing::{contracts_to_dollars, dollars_to_contracts, PositionSize};
