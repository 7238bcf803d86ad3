use crate::strategy::types::{HedgeOutcome, StrategyKind, StrategyResult};

/// Pick the recommended strategy
///
/// The perfect hedge wins when its guaranteed profit is at least the exit
/// profit; ties go to the hedge. An unavailable hedge always yields the exit.
pub fn recommend(exit: &StrategyResult, perfect_hedge: &HedgeOutcome) -> StrategyKind {
    match perfect_hedge.result() {
        Some(hedge) if hedge.guaranteed_profit >= exit.profit => StrategyKind::PerfectHedge,
        _ => StrategyKind::Exit,
    }
}
