use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{HedgeError, HedgeUnavailable, Result};
use crate::common::types::{Side, TradeAction};
use crate::strategy::fees::{FeeBreakdown, FeeSchedule};
use crate::strategy::sizing::PositionSize;

/// Lowest accepted entry price
pub const MIN_BUY_PRICE: Decimal = dec!(0.01);
/// Highest accepted entry price
pub const MAX_BUY_PRICE: Decimal = dec!(0.99);
/// Largest accepted position, in contracts
pub const MAX_SHARES: Decimal = dec!(1000000000);

/// The trader's current holding in the held market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    /// Contract count
    pub shares: Decimal,
    /// Entry price per contract, from $0.01 to $0.99
    pub buy_price: Decimal,
}

impl Position {
    /// Create a validated position
    pub fn new(side: Side, shares: Decimal, buy_price: Decimal) -> Result<Self> {
        let position = Self {
            side,
            shares,
            buy_price,
        };
        position.validate()?;
        Ok(position)
    }

    /// Create a position from either sizing form
    ///
    /// Dollar sizes are floored to whole contracts at `buy_price`.
    pub fn from_size(side: Side, size: PositionSize, buy_price: Decimal) -> Result<Self> {
        if let PositionSize::Dollars(dollars) = size {
            if dollars <= Decimal::ZERO {
                return Err(HedgeError::invalid_position(
                    "dollars",
                    "dollar amount must be greater than 0",
                ));
            }
        }
        Self::validate_buy_price(buy_price)?;
        Self::new(side, size.to_contracts(buy_price), buy_price)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shares <= Decimal::ZERO {
            return Err(HedgeError::invalid_position(
                "shares",
                "number of shares must be greater than 0",
            ));
        }
        if self.shares > MAX_SHARES {
            return Err(HedgeError::invalid_position(
                "shares",
                format!("number of shares must not exceed {}, got {}", MAX_SHARES, self.shares),
            ));
        }
        Self::validate_buy_price(self.buy_price)
    }

    fn validate_buy_price(buy_price: Decimal) -> Result<()> {
        if buy_price < MIN_BUY_PRICE || buy_price > MAX_BUY_PRICE {
            return Err(HedgeError::invalid_position(
                "buy_price",
                format!("buy price must be between $0.01 and $0.99, got {}", buy_price),
            ));
        }
        Ok(())
    }

    /// Amount paid to open the position
    pub fn initial_cost(&self) -> Decimal {
        self.shares * self.buy_price
    }
}

/// Best bid/ask for both outcomes of one market
///
/// Quotes are pass-through: values outside (0, 1) or a crossed book are
/// computed with as given.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    pub yes_ask: Decimal,
    pub yes_bid: Decimal,
    pub no_ask: Decimal,
    pub no_bid: Decimal,
}

impl Quote {
    pub fn new(yes_ask: Decimal, yes_bid: Decimal, no_ask: Decimal, no_bid: Decimal) -> Self {
        Self {
            yes_ask,
            yes_bid,
            no_ask,
            no_bid,
        }
    }

    /// Price to buy one share of `side`
    pub fn ask(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_ask,
            Side::No => self.no_ask,
        }
    }

    /// Price received when selling one share of `side`
    pub fn bid(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_bid,
            Side::No => self.no_bid,
        }
    }

    /// True when any price lies outside (0, 1) or an ask sits below its bid
    pub fn is_degenerate(&self) -> bool {
        let in_range = |price: Decimal| price > Decimal::ZERO && price < Decimal::ONE;
        ![self.yes_ask, self.yes_bid, self.no_ask, self.no_bid]
            .into_iter()
            .all(in_range)
            || self.yes_ask < self.yes_bid
            || self.no_ask < self.no_bid
    }
}

/// Read-only inputs for a single strategy calculation
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub position: &'a Position,
    pub quote: &'a Quote,
    /// Quote for the complementary market, used as the hedge instrument
    pub opposite_quote: Option<&'a Quote>,
    pub fees: &'a FeeSchedule,
}

impl<'a> StrategyContext<'a> {
    pub fn new(
        position: &'a Position,
        quote: &'a Quote,
        opposite_quote: Option<&'a Quote>,
        fees: &'a FeeSchedule,
    ) -> Self {
        Self {
            position,
            quote,
            opposite_quote,
            fees,
        }
    }

    /// YES ask of the opposite market, if it can be hedged against
    pub fn hedge_price(&self) -> std::result::Result<Decimal, HedgeUnavailable> {
        let quote = self
            .opposite_quote
            .ok_or(HedgeUnavailable::MissingOppositeQuote)?;

        if quote.yes_ask <= Decimal::ZERO {
            return Err(HedgeUnavailable::NonPositiveHedgePrice {
                price: quote.yes_ask,
            });
        }
        Ok(quote.yes_ask)
    }
}

/// Which strategy a result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    Exit,
    PerfectHedge,
    PartialHedge { percent: Decimal },
}

/// Canonical partial hedge sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialTier {
    Conservative,
    Moderate,
    Minimal,
}

impl PartialTier {
    pub const ALL: [PartialTier; 3] = [
        PartialTier::Conservative,
        PartialTier::Moderate,
        PartialTier::Minimal,
    ];

    pub fn percent(self) -> Decimal {
        match self {
            PartialTier::Conservative => dec!(80),
            PartialTier::Moderate => dec!(50),
            PartialTier::Minimal => dec!(25),
        }
    }

    pub fn from_percent(percent: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.percent() == percent)
    }
}

impl std::fmt::Display for PartialTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartialTier::Conservative => write!(f, "Conservative"),
            PartialTier::Moderate => write!(f, "Moderate"),
            PartialTier::Minimal => write!(f, "Minimal"),
        }
    }
}

/// Which market a trade leg executes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketLeg {
    /// The market the position was opened in
    Held,
    /// The complementary market
    Opposite,
}

/// The single trade a strategy asks the trader to place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLeg {
    pub market: MarketLeg,
    pub outcome: Side,
    pub action: TradeAction,
    pub shares: Decimal,
    pub price: Decimal,
    /// shares * price, before fees
    pub notional: Decimal,
}

/// Remaining risk after executing a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    PositionClosed,
    ProfitLocked,
    LossLocked,
    FullyHedged,
    PartialExposure,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::PositionClosed => "None - position fully closed",
            RiskLevel::ProfitLocked => "None - profit locked in regardless of outcome",
            RiskLevel::LossLocked => "Locks in a guaranteed loss",
            RiskLevel::FullyHedged => "None",
            RiskLevel::PartialExposure => "Moderate - partial exposure remains",
        }
    }
}

/// Advisory notes attached to a perfect hedge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HedgeWarning {
    /// Held YES ask plus opposite YES ask exceeds the configured threshold
    WideSpread { price_sum: Decimal },
    /// Both outcomes end below the initial cost
    LocksInLoss,
    /// Position is not yet worth more than it cost at the current bid
    NoUnrealizedGain,
}

impl HedgeWarning {
    pub fn message(&self) -> &'static str {
        match self {
            HedgeWarning::WideSpread { .. } => {
                "Market prices look expensive to hedge right now (wide spread)."
            }
            HedgeWarning::LocksInLoss => {
                "This hedge would lock in a loss. Use only to stop further downside."
            }
            HedgeWarning::NoUnrealizedGain => {
                "Your position hasn't moved in your favor yet. Hedging now may lock in a loss or break-even."
            }
        }
    }
}

/// Outcome of one strategy calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    pub kind: StrategyKind,
    pub name: String,
    pub action: String,
    pub trade: TradeLeg,
    /// What the original position cost
    pub initial_cost: Decimal,
    /// Cash this strategy's own trade consumes: hedge notional plus fees for
    /// hedges, fees alone for an exit
    pub cost: Decimal,
    pub fees: FeeBreakdown,
    /// initial_cost + cost
    pub total_investment: Decimal,
    pub profit_if_original_wins: Decimal,
    pub profit_if_opposite_wins: Decimal,
    /// Minimum over both resolutions
    pub guaranteed_profit: Decimal,
    /// Headline figure: guaranteed for exit and perfect hedge, best case for
    /// partial hedges
    pub profit: Decimal,
    pub profit_percent: Decimal,
    pub risk: RiskLevel,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<HedgeWarning>,
}

impl StrategyResult {
    /// Absolute gap between the two conditional profits
    pub fn outcome_spread(&self) -> Decimal {
        (self.profit_if_original_wins - self.profit_if_opposite_wins).abs()
    }
}

/// Hedge-family result, or the reason it could not be computed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HedgeOutcome {
    Available(StrategyResult),
    Unavailable {
        reason: HedgeUnavailable,
        message: String,
    },
}

impl HedgeOutcome {
    pub fn unavailable(reason: HedgeUnavailable) -> Self {
        let message = reason.to_string();
        Self::Unavailable { reason, message }
    }

    pub fn result(&self) -> Option<&StrategyResult> {
        match self {
            Self::Available(result) => Some(result),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&HedgeUnavailable> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { reason, .. } => Some(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// One partial hedge in a strategy set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialHedgeEntry {
    pub percent: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<PartialTier>,
    pub outcome: HedgeOutcome,
}

/// Every strategy computed for one position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySet {
    pub exit: StrategyResult,
    pub perfect_hedge: HedgeOutcome,
    pub partial_hedges: Vec<PartialHedgeEntry>,
    pub recommended: StrategyKind,
}

impl StrategySet {
    /// Partial hedge computed at `percent`, if it was part of this set
    pub fn partial(&self, percent: Decimal) -> Option<&HedgeOutcome> {
        self.partial_hedges
            .iter()
            .find(|entry| entry.percent == percent)
            .map(|entry| &entry.outcome)
    }

    /// Partial hedge for a canonical tier
    pub fn tier(&self, tier: PartialTier) -> Option<&HedgeOutcome> {
        self.partial(tier.percent())
    }

    /// The result flagged as recommended
    pub fn recommended_result(&self) -> &StrategyResult {
        match self.recommended {
            StrategyKind::PerfectHedge => self.perfect_hedge.result().unwrap_or(&self.exit),
            _ => &self.exit,
        }
    }
}
