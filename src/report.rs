//! Plain-text and JSON rendering of computed strategies

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use crate::market::MarketMetadata;
use crate::strategy::{HedgeOutcome, Position, StrategyResult, StrategySet};

/// Serializable bundle printed by `--json`
#[derive(Debug, Clone, Serialize)]
pub struct HedgeReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<&'a MarketMetadata>,
    pub position: &'a Position,
    pub strategies: &'a StrategySet,
}

fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        // "-0.00" otherwise
        rounded.set_sign_positive(true);
    }
    rounded
}

/// `$` followed by the absolute amount to cents; callers say profit or loss
pub fn format_currency(amount: Decimal) -> String {
    format!("${}", round_half_away(amount.abs(), 2))
}

/// Signed percent with one decimal, e.g. `+10.3%`
pub fn format_percent(percent: Decimal) -> String {
    let rounded = round_half_away(percent, 1);
    let sign = if rounded >= Decimal::ZERO { "+" } else { "" };
    format!("{}{}%", sign, rounded)
}

fn profit_phrase(amount: Decimal) -> String {
    let word = if amount >= Decimal::ZERO { "profit" } else { "loss" };
    format!("{} {}", format_currency(amount), word)
}

struct ResultText<'a> {
    result: &'a StrategyResult,
    recommended: bool,
}

impl fmt::Display for ResultText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let marker = if self.recommended { " [recommended]" } else { "" };
        writeln!(f, "{}{}", result.name, marker)?;
        writeln!(f, "  Action: {}", result.action)?;
        writeln!(
            f,
            "  Fees: {} (taker {}, transaction {})",
            format_currency(result.fees.total),
            format_currency(result.fees.taker),
            format_currency(result.fees.transaction)
        )?;

        if result.outcome_spread().is_zero() {
            writeln!(
                f,
                "  Result: {} ({})",
                profit_phrase(result.profit),
                format_percent(result.profit_percent)
            )?;
        } else {
            writeln!(f, "  If your pick wins: {}", profit_phrase(result.profit_if_original_wins))?;
            writeln!(
                f,
                "  If the other side wins: {}",
                profit_phrase(result.profit_if_opposite_wins)
            )?;
            writeln!(
                f,
                "  Guaranteed: {} ({})",
                profit_phrase(result.guaranteed_profit),
                format_percent(result.profit_percent)
            )?;
        }

        writeln!(f, "  Risk: {}", result.risk.label())?;
        writeln!(f, "  {}", result.description)?;
        for warning in &result.warnings {
            writeln!(f, "  Warning: {}", warning.message())?;
        }
        Ok(())
    }
}

struct OutcomeText<'a> {
    name: &'a str,
    outcome: &'a HedgeOutcome,
    recommended: bool,
}

impl fmt::Display for OutcomeText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            HedgeOutcome::Available(result) => {
                let text = ResultText {
                    result,
                    recommended: self.recommended,
                };
                write!(f, "{}", text)
            }
            HedgeOutcome::Unavailable { message, .. } => {
                writeln!(f, "{}", self.name)?;
                writeln!(f, "  Unavailable: {}", message)
            }
        }
    }
}

/// Human-readable summary of every strategy in a set
pub struct StrategySetText<'a>(pub &'a StrategySet);

impl fmt::Display for StrategySetText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies = self.0;
        let recommended = strategies.recommended;

        let exit = ResultText {
            result: &strategies.exit,
            recommended: recommended == strategies.exit.kind,
        };
        writeln!(f, "{}", exit)?;

        let perfect = OutcomeText {
            name: "Perfect Hedge",
            outcome: &strategies.perfect_hedge,
            recommended: strategies
                .perfect_hedge
                .result()
                .map(|r| r.kind == recommended)
                .unwrap_or(false),
        };
        write!(f, "{}", perfect)?;

        for entry in &strategies.partial_hedges {
            let name = format!("Partial Hedge ({}%)", entry.percent.normalize());
            let partial = OutcomeText {
                name: &name,
                outcome: &entry.outcome,
                recommended: false,
            };
            write!(f, "\n{}", partial)?;
        }
        Ok(())
    }
}

/// Market header, position line and the strategy summary
impl fmt::Display for HedgeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(market) = self.market {
            writeln!(f, "{} market: {}", market.platform, market.title)?;
            if !market.subtitle.is_empty() {
                writeln!(f, "  {}", market.subtitle)?;
            }
            writeln!(f, "  YES pays on: {}", market.yes_label)?;
            if let Some(opposite) = &market.opposite_label {
                writeln!(f, "  Hedge market: {}", opposite)?;
            }
            writeln!(f, "  Status: {}", market.status)?;
            writeln!(f)?;
        }

        let position = self.position;
        writeln!(
            f,
            "Position: {} {} shares at ${} (cost {})",
            position.shares.normalize(),
            position.side,
            round_half_away(position.buy_price, 2),
            format_currency(position.initial_cost())
        )?;
        writeln!(f)?;
        write!(f, "{}", StrategySetText(self.strategies))
    }
}
