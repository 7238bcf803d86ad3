//! Conversion between dollar and contract position sizes
//!
//! The engine only ever sees contracts. Dollar input is converted once, at
//! the boundary, with `floor(dollars / price)`: the conversion can leave part
//! of the dollar amount unspent but never spends more than was entered.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position size as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum PositionSize {
    Contracts(Decimal),
    Dollars(Decimal),
}

impl PositionSize {
    /// Size in contracts at the given price
    pub fn to_contracts(&self, price: Decimal) -> Decimal {
        match *self {
            PositionSize::Contracts(contracts) => contracts,
            PositionSize::Dollars(dollars) => dollars_to_contracts(dollars, price),
        }
    }

    /// Size in dollars at the given price
    pub fn to_dollars(&self, price: Decimal) -> Decimal {
        match *self {
            PositionSize::Contracts(contracts) => contracts_to_dollars(contracts, price),
            PositionSize::Dollars(dollars) => dollars,
        }
    }
}

/// Whole contracts affordable with `dollars` at `price`
///
/// Saturates at `Decimal::MAX`, which position validation then rejects.
pub fn dollars_to_contracts(dollars: Decimal, price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    dollars
        .checked_div(price)
        .map_or(Decimal::MAX, |contracts| contracts.floor())
}

/// Dollar value of `contracts` at `price`
pub fn contracts_to_dollars(contracts: Decimal, price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    contracts.checked_mul(price).unwrap_or(Decimal::MAX)
}
