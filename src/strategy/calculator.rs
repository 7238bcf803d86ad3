//! Exit, perfect hedge and partial hedge calculators
//!
//! Every calculator is a pure function of its [`StrategyContext`]. Hedges are
//! always bought as YES shares of the opposite market at its ask.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::common::errors::{HedgeError, Result};
use crate::common::types::{Side, TradeAction};
use crate::config::types::AppSettings;
use crate::strategy::fees::{FeeBreakdown, FeeSchedule};
use crate::strategy::ranking;
use crate::strategy::types::{
    HedgeOutcome, HedgeWarning, MarketLeg, PartialHedgeEntry, PartialTier, Position, Quote,
    RiskLevel, StrategyContext, StrategyKind, StrategyResult, StrategySet, TradeLeg,
};

/// Held YES ask plus opposite YES ask above which hedging is flagged as expensive
pub const DEFAULT_SPREAD_WARNING_THRESHOLD: Decimal = dec!(1.05);

/// Tolerance for treating two profit figures as equal
pub const PROFIT_TOLERANCE: Decimal = dec!(0.000001);

const HUNDRED: Decimal = dec!(100);

/// Strategy engine
///
/// Holds only presentation-independent settings; positions, quotes and fees
/// are passed to every call.
#[derive(Debug, Clone)]
pub struct HedgeCalculator {
    spread_warning_threshold: Decimal,
    partial_percents: Vec<Decimal>,
}

impl HedgeCalculator {
    /// Engine with the canonical 80/50/25 partial hedge tiers
    pub fn new() -> Self {
        Self {
            spread_warning_threshold: DEFAULT_SPREAD_WARNING_THRESHOLD,
            partial_percents: PartialTier::ALL.iter().map(|tier| tier.percent()).collect(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        Self::new()
            .with_spread_warning_threshold(settings.spread_warning_threshold)
            .with_partial_percents(settings.partial_hedge_percents.clone())
    }

    pub fn with_spread_warning_threshold(mut self, threshold: Decimal) -> Self {
        self.spread_warning_threshold = threshold;
        self
    }

    /// Replace the partial hedge sizes computed by [`compute_strategies`](Self::compute_strategies)
    pub fn with_partial_percents(mut self, percents: Vec<Decimal>) -> Result<Self> {
        for &percent in &percents {
            validate_percent(percent)?;
        }
        self.partial_percents = percents;
        Ok(self)
    }

    pub fn partial_percents(&self) -> &[Decimal] {
        &self.partial_percents
    }

    /// Compute every strategy for a position
    ///
    /// Fails on an invalid position, or when a quote is so far out of range
    /// that a figure overflows. A missing or unusable opposite quote marks the
    /// hedge entries unavailable; degenerate quotes are logged and computed
    /// with as given.
    pub fn compute_strategies(
        &self,
        position: &Position,
        quote: &Quote,
        opposite_quote: Option<&Quote>,
        fees: &FeeSchedule,
    ) -> Result<StrategySet> {
        position.validate()?;

        if quote.is_degenerate() {
            warn!(?quote, "Held market quote is degenerate; results may be unfavorable");
        }
        if let Some(opposite) = opposite_quote.filter(|q| q.is_degenerate()) {
            warn!(?opposite, "Opposite market quote is degenerate; results may be unfavorable");
        }

        let ctx = StrategyContext::new(position, quote, opposite_quote, fees);

        let exit = self.exit(&ctx)?;
        let perfect_hedge = self.perfect_hedge(&ctx)?;
        let partial_hedges = self
            .partial_percents
            .iter()
            .map(|&percent| {
                Ok(PartialHedgeEntry {
                    percent,
                    tier: PartialTier::from_percent(percent),
                    outcome: self.partial_hedge(&ctx, percent)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let recommended = ranking::recommend(&exit, &perfect_hedge);
        debug!(?recommended, exit_profit = %exit.profit, "Strategies computed");

        Ok(StrategySet {
            exit,
            perfect_hedge,
            partial_hedges,
            recommended,
        })
    }

    /// Sell the whole position at the held side's bid
    pub fn exit(&self, ctx: &StrategyContext<'_>) -> Result<StrategyResult> {
        let position = ctx.position;
        let sell_price = ctx.quote.bid(position.side);

        let initial_cost = position.initial_cost();
        let gross_revenue = mul(position.shares, sell_price, "exit revenue")?;
        let fees = ctx.fees.apply(gross_revenue)?;
        let net_revenue = sub(gross_revenue, fees.total, "exit revenue")?;
        let profit = sub(net_revenue, initial_cost, "exit profit")?;

        debug!(%gross_revenue, %net_revenue, %profit, "Exit computed");

        Ok(StrategyResult {
            kind: StrategyKind::Exit,
            name: "Simple Exit".to_string(),
            action: format!(
                "Sell {} {} shares at ${}",
                position.shares.normalize(),
                position.side,
                sell_price.round_dp(2)
            ),
            trade: TradeLeg {
                market: MarketLeg::Held,
                outcome: position.side,
                action: TradeAction::Sell,
                shares: position.shares,
                price: sell_price,
                notional: gross_revenue,
            },
            initial_cost,
            cost: fees.total,
            fees,
            total_investment: add(initial_cost, fees.total, "exit investment")?,
            profit_if_original_wins: profit,
            profit_if_opposite_wins: profit,
            guaranteed_profit: profit,
            profit,
            profit_percent: percent_of(profit, initial_cost)?,
            risk: RiskLevel::PositionClosed,
            description: "Exit your position immediately and lock in current profit/loss (after fees)."
                .to_string(),
            warnings: Vec::new(),
        })
    }

    /// Hedge sized so profit is identical whichever side resolves true
    pub fn perfect_hedge(&self, ctx: &StrategyContext<'_>) -> Result<HedgeOutcome> {
        let hedge_price = match ctx.hedge_price() {
            Ok(price) => price,
            Err(reason) => {
                debug!(%reason, "Perfect hedge unavailable");
                return Ok(HedgeOutcome::unavailable(reason));
            }
        };

        let figures = HedgeFigures::compute(ctx, hedge_price, Decimal::ONE)?;
        let guaranteed_profit = figures.profit_if_original_wins.min(figures.profit_if_opposite_wins);

        let spread = sub(
            figures.profit_if_original_wins,
            figures.profit_if_opposite_wins,
            "outcome spread",
        )?
        .abs();
        if spread > PROFIT_TOLERANCE {
            warn!(%spread, "Perfect hedge outcomes differ beyond tolerance");
        }

        let (risk, description) = if guaranteed_profit >= Decimal::ZERO {
            (
                RiskLevel::ProfitLocked,
                format!(
                    "Lock in a guaranteed profit of ${} no matter what happens.",
                    guaranteed_profit.round_dp(2)
                ),
            )
        } else {
            (
                RiskLevel::LossLocked,
                format!(
                    "This would lock in a loss of ${}. Only hedge if you want to stop further losses.",
                    guaranteed_profit.abs().round_dp(2)
                ),
            )
        };

        let warnings = self.perfect_hedge_warnings(ctx, hedge_price, guaranteed_profit)?;
        debug!(hedge_shares = %figures.hedge_shares, hedge_cost = %figures.hedge_cost, %guaranteed_profit, "Perfect hedge computed");

        Ok(HedgeOutcome::Available(figures.into_result(
            StrategyKind::PerfectHedge,
            "Perfect Hedge".to_string(),
            guaranteed_profit,
            guaranteed_profit,
            risk,
            description,
            warnings,
        )?))
    }

    /// Hedge `percent` of the perfect-hedge share count
    ///
    /// Accepts any percent from 0 to 100. The headline profit is the better
    /// of the two outcomes since upside is retained on the original side.
    pub fn partial_hedge(&self, ctx: &StrategyContext<'_>, percent: Decimal) -> Result<HedgeOutcome> {
        validate_percent(percent)?;

        let hedge_price = match ctx.hedge_price() {
            Ok(price) => price,
            Err(reason) => return Ok(HedgeOutcome::unavailable(reason)),
        };

        let figures = HedgeFigures::compute(ctx, hedge_price, percent / HUNDRED)?;
        let guaranteed_profit = figures.profit_if_original_wins.min(figures.profit_if_opposite_wins);
        let best_profit = figures.profit_if_original_wins.max(figures.profit_if_opposite_wins);

        let risk = if percent < HUNDRED {
            RiskLevel::PartialExposure
        } else {
            RiskLevel::FullyHedged
        };
        let percent_label = percent.normalize();

        Ok(HedgeOutcome::Available(figures.into_result(
            StrategyKind::PartialHedge { percent },
            format!("Partial Hedge ({}%)", percent_label),
            guaranteed_profit,
            best_profit,
            risk,
            format!(
                "Hedge {}% of your position. You keep some upside if your original pick wins, and add a safety net if it doesn't.",
                percent_label
            ),
            Vec::new(),
        )?))
    }

    fn perfect_hedge_warnings(
        &self,
        ctx: &StrategyContext<'_>,
        hedge_price: Decimal,
        guaranteed_profit: Decimal,
    ) -> Result<Vec<HedgeWarning>> {
        let mut warnings = Vec::new();

        let price_sum = add(ctx.quote.yes_ask, hedge_price, "price sum")?;
        if price_sum > self.spread_warning_threshold {
            warnings.push(HedgeWarning::WideSpread { price_sum });
        }

        if guaranteed_profit < Decimal::ZERO {
            warnings.push(HedgeWarning::LocksInLoss);
        }

        let position = ctx.position;
        let market_value = mul(position.shares, ctx.quote.bid(position.side), "unrealized gain")?;
        if sub(market_value, position.initial_cost(), "unrealized gain")? <= Decimal::ZERO {
            warnings.push(HedgeWarning::NoUnrealizedGain);
        }

        Ok(warnings)
    }
}

impl Default for HedgeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Figures shared by the perfect and partial hedge calculators
struct HedgeFigures {
    hedge_price: Decimal,
    hedge_shares: Decimal,
    hedge_cost: Decimal,
    fees: FeeBreakdown,
    initial_cost: Decimal,
    total_investment: Decimal,
    profit_if_original_wins: Decimal,
    profit_if_opposite_wins: Decimal,
}

impl HedgeFigures {
    /// Size the hedge from the payoff equalization, then scale by `fraction`
    ///
    /// With payout `P` (one unit per original share), initial cost `C0`, hedge
    /// price `H`, hedge notional `c` and hedge fees `F`:
    ///
    /// ```text
    /// original wins:  P - C0 - c - F
    /// opposite wins:  c / H - C0 - F
    /// ```
    ///
    /// `F` appears in both branches and drops out, leaving `c = P / (1 + 1/H)`,
    /// or `P / (1 + H)` hedge shares.
    fn compute(ctx: &StrategyContext<'_>, hedge_price: Decimal, fraction: Decimal) -> Result<Self> {
        let payout = ctx.position.shares;
        let initial_cost = ctx.position.initial_cost();

        let divisor = add(Decimal::ONE, hedge_price, "hedge size")?;
        let hedge_shares = mul(div(payout, divisor, "hedge size")?, fraction, "hedge size")?;
        let hedge_cost = mul(hedge_shares, hedge_price, "hedge cost")?;
        let fees = ctx.fees.apply(hedge_cost)?;

        let outlay = add(hedge_cost, fees.total, "hedge cost")?;
        let total_investment = add(initial_cost, outlay, "hedge investment")?;
        let profit_if_original_wins = sub(payout, total_investment, "hedge profit")?;
        let profit_if_opposite_wins = sub(
            hedge_shares,
            add(initial_cost, fees.total, "hedge profit")?,
            "hedge profit",
        )?;

        Ok(Self {
            hedge_price,
            hedge_shares,
            hedge_cost,
            fees,
            initial_cost,
            total_investment,
            profit_if_original_wins,
            profit_if_opposite_wins,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn into_result(
        self,
        kind: StrategyKind,
        name: String,
        guaranteed_profit: Decimal,
        profit: Decimal,
        risk: RiskLevel,
        description: String,
        warnings: Vec<HedgeWarning>,
    ) -> Result<StrategyResult> {
        Ok(StrategyResult {
            kind,
            name,
            action: format!(
                "Buy {} {} shares in the opposite market at ${}",
                self.hedge_shares.round_dp(2),
                Side::Yes,
                self.hedge_price.round_dp(2)
            ),
            trade: TradeLeg {
                market: MarketLeg::Opposite,
                outcome: Side::Yes,
                action: TradeAction::Buy,
                shares: self.hedge_shares,
                price: self.hedge_price,
                notional: self.hedge_cost,
            },
            initial_cost: self.initial_cost,
            cost: add(self.hedge_cost, self.fees.total, "hedge cost")?,
            fees: self.fees,
            total_investment: self.total_investment,
            profit_if_original_wins: self.profit_if_original_wins,
            profit_if_opposite_wins: self.profit_if_opposite_wins,
            guaranteed_profit,
            profit,
            profit_percent: percent_of(profit, self.initial_cost)?,
            risk,
            description,
            warnings,
        })
    }
}

fn validate_percent(percent: Decimal) -> Result<()> {
    if percent < Decimal::ZERO || percent > HUNDRED {
        return Err(HedgeError::InvalidHedgePercent(percent));
    }
    Ok(())
}

fn mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or(HedgeError::ArithmeticOverflow(what))
}

fn div(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_div(b).ok_or(HedgeError::ArithmeticOverflow(what))
}

fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_add(b).ok_or(HedgeError::ArithmeticOverflow(what))
}

fn sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_sub(b).ok_or(HedgeError::ArithmeticOverflow(what))
}

fn percent_of(value: Decimal, base: Decimal) -> Result<Decimal> {
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    mul(div(value, base, "profit percent")?, HUNDRED, "profit percent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::types::MAX_SHARES;
    use rust_decimal_macros::dec;

    fn position() -> Position {
        Position::new(Side::Yes, dec!(100), dec!(0.46)).unwrap()
    }

    fn quote() -> Quote {
        Quote::new(dec!(0.56), dec!(0.54), dec!(0.46), dec!(0.44))
    }

    fn opposite() -> Quote {
        Quote::new(dec!(0.55), dec!(0.53), dec!(0.47), dec!(0.45))
    }

    fn fees() -> FeeSchedule {
        FeeSchedule::new(dec!(0.02), dec!(0.05), dec!(0.01))
    }

    #[test]
    fn test_exit_figures() {
        let (position, quote, fees) = (position(), quote(), fees());
        let ctx = StrategyContext::new(&position, &quote, None, &fees);
        let exit = HedgeCalculator::new().exit(&ctx).unwrap();

        assert_eq!(exit.trade.notional, dec!(54.00));
        assert_eq!(exit.fees.total, dec!(3.24));
        assert_eq!(exit.initial_cost, dec!(46.00));
        assert_eq!(exit.profit, dec!(4.76));
        assert_eq!(exit.guaranteed_profit, exit.profit);
        assert_eq!(exit.profit_percent.round_dp(2), dec!(10.35));
        assert_eq!(exit.risk, RiskLevel::PositionClosed);
        assert_eq!(exit.action, "Sell 100 YES shares at $0.54");
    }

    #[test]
    fn test_exit_sells_no_side_at_no_bid() {
        let position = Position::new(Side::No, dec!(10), dec!(0.40)).unwrap();
        let (quote, fees) = (quote(), FeeSchedule::free());
        let ctx = StrategyContext::new(&position, &quote, None, &fees);
        let exit = HedgeCalculator::new().exit(&ctx).unwrap();

        assert_eq!(exit.trade.price, dec!(0.44));
        assert_eq!(exit.profit, dec!(0.40));
    }

    #[test]
    fn test_perfect_hedge_equalizes() {
        let (position, quote, opposite, fees) = (position(), quote(), opposite(), fees());
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        let hedge = HedgeCalculator::new().perfect_hedge(&ctx).unwrap();
        let result = hedge.result().unwrap();

        assert_eq!(result.trade.notional.round_dp(2), dec!(35.48));
        assert_eq!(result.trade.shares.round_dp(2), dec!(64.52));
        assert!(result.outcome_spread() <= PROFIT_TOLERANCE);
        assert_eq!(result.guaranteed_profit.round_dp(2), dec!(16.39));
        assert_eq!(result.risk, RiskLevel::ProfitLocked);
    }

    #[test]
    fn test_perfect_hedge_warnings() {
        let (position, quote, opposite, fees) = (position(), quote(), opposite(), fees());
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        let result = HedgeCalculator::new().perfect_hedge(&ctx).unwrap();
        let warnings = &result.result().unwrap().warnings;

        // 0.56 + 0.55 = 1.11 > 1.05
        assert_eq!(warnings, &vec![HedgeWarning::WideSpread { price_sum: dec!(1.11) }]);

        let relaxed = HedgeCalculator::new().with_spread_warning_threshold(dec!(1.2));
        assert!(relaxed.perfect_hedge(&ctx).unwrap().result().unwrap().warnings.is_empty());
    }

    #[test]
    fn test_losing_hedge_is_flagged() {
        let position = Position::new(Side::Yes, dec!(100), dec!(0.70)).unwrap();
        let quote = Quote::new(dec!(0.42), dec!(0.40), dec!(0.60), dec!(0.58));
        let opposite = Quote::new(dec!(0.60), dec!(0.58), dec!(0.42), dec!(0.40));
        let fees = fees();
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        let result = HedgeCalculator::new().perfect_hedge(&ctx).unwrap();
        let result = result.result().unwrap();

        assert!(result.guaranteed_profit < Decimal::ZERO);
        assert_eq!(result.risk, RiskLevel::LossLocked);
        assert!(result.warnings.contains(&HedgeWarning::LocksInLoss));
        assert!(result.warnings.contains(&HedgeWarning::NoUnrealizedGain));
        assert!(result.description.starts_with("This would lock in a loss"));
    }

    #[test]
    fn test_out_of_range_quote_is_an_error() {
        let position = Position::new(Side::Yes, MAX_SHARES, dec!(0.5)).unwrap();
        let huge = Decimal::from_scientific("1e27").unwrap();
        let quote = Quote::new(huge, huge, dec!(0.46), dec!(0.44));
        let fees = fees();
        let calculator = HedgeCalculator::new();

        let ctx = StrategyContext::new(&position, &quote, None, &fees);
        assert!(matches!(calculator.exit(&ctx), Err(HedgeError::ArithmeticOverflow(_))));
        assert!(matches!(
            calculator.compute_strategies(&position, &quote, None, &fees),
            Err(HedgeError::ArithmeticOverflow(_))
        ));

        let quote = self::quote();
        let opposite = Quote::new(Decimal::MAX, dec!(0.5), dec!(0.5), dec!(0.5));
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        assert!(matches!(
            calculator.perfect_hedge(&ctx),
            Err(HedgeError::ArithmeticOverflow("hedge size"))
        ));
    }

    #[test]
    fn test_partial_hedge_rejects_out_of_range_percent() {
        let (position, quote, opposite, fees) = (position(), quote(), opposite(), fees());
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        let calculator = HedgeCalculator::new();

        assert!(matches!(
            calculator.partial_hedge(&ctx, dec!(101)),
            Err(HedgeError::InvalidHedgePercent(_))
        ));
        assert!(matches!(
            calculator.partial_hedge(&ctx, dec!(-1)),
            Err(HedgeError::InvalidHedgePercent(_))
        ));
    }

    #[test]
    fn test_partial_hedge_keeps_upside() {
        let (position, quote, opposite, fees) = (position(), quote(), opposite(), fees());
        let ctx = StrategyContext::new(&position, &quote, Some(&opposite), &fees);
        let outcome = HedgeCalculator::new().partial_hedge(&ctx, dec!(50)).unwrap();
        let result = outcome.result().unwrap();

        assert!(result.profit_if_original_wins > result.profit_if_opposite_wins);
        assert_eq!(result.profit, result.profit_if_original_wins);
        assert_eq!(result.guaranteed_profit, result.profit_if_opposite_wins);
        assert_eq!(result.risk, RiskLevel::PartialExposure);
        assert_eq!(result.name, "Partial Hedge (50%)");
    }

    #[test]
    fn test_invalid_configured_percents() {
        assert!(HedgeCalculator::new().with_partial_percents(vec![dec!(150)]).is_err());
        let calculator = HedgeCalculator::new()
            .with_partial_percents(vec![dec!(60), dec!(30)])
            .unwrap();
        assert_eq!(calculator.partial_percents(), &[dec!(60), dec!(30)]);
    }
}
