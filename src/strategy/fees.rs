use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{HedgeError, Result};
use crate::common::types::Platform;

/// Where a fee schedule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeSource {
    /// Built-in estimate; neither platform publishes fees through its market API
    #[default]
    Estimated,
    /// Supplied by configuration
    Configured,
}

/// Fee schedule for a market
///
/// All rates are fractions of trade notional (0.05 = 5%). Rates apply to the
/// gross notional of a single trade leg and are never compounded across legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Maker fee (providing liquidity). Informational only: every trade the
    /// engine models takes liquidity.
    pub maker_fee: Decimal,
    /// Taker fee (taking liquidity)
    pub taker_fee: Decimal,
    /// Per-transaction fee
    pub transaction_fee: Decimal,
    #[serde(default)]
    pub source: FeeSource,
}

impl FeeSchedule {
    pub fn new(maker_fee: Decimal, taker_fee: Decimal, transaction_fee: Decimal) -> Self {
        Self {
            maker_fee,
            taker_fee,
            transaction_fee,
            source: FeeSource::Configured,
        }
    }

    /// Estimated fee structure
    /// - 2% maker fee
    /// - 5% taker fee
    /// - 1% transaction fee
    pub fn estimated() -> Self {
        Self {
            maker_fee: dec!(0.02),
            taker_fee: dec!(0.05),
            transaction_fee: dec!(0.01),
            source: FeeSource::Estimated,
        }
    }

    /// Zero-fee schedule
    pub fn free() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }

    /// Get fees for a platform
    ///
    /// Kalshi's event API carries no fee data and Polymarket's Gamma API
    /// neither, so both fall back to the same estimate.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Kalshi | Platform::Polymarket => Self::estimated(),
        }
    }

    /// Reject negative rates; the first offending field is named
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("maker_fee", self.maker_fee),
            ("taker_fee", self.taker_fee),
            ("transaction_fee", self.transaction_fee),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(HedgeError::Configuration(format!(
                    "fees.{} must not be negative, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }

    /// Apply the schedule to a trade notional
    ///
    /// A negative notional is clamped to zero so no negative fee is produced.
    pub fn apply(&self, notional: Decimal) -> Result<FeeBreakdown> {
        let notional = notional.max(Decimal::ZERO);
        let overflow = || HedgeError::ArithmeticOverflow("fees");
        let taker = notional.checked_mul(self.taker_fee).ok_or_else(overflow)?;
        let transaction = notional
            .checked_mul(self.transaction_fee)
            .ok_or_else(overflow)?;

        Ok(FeeBreakdown {
            taker,
            transaction,
            total: taker.checked_add(transaction).ok_or_else(overflow)?,
        })
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::estimated()
    }
}

/// Fees charged on one trade leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub taker: Decimal,
    pub transaction: Decimal,
    pub total: Decimal,
}
