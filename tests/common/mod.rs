//! Common test utilities and fixtures

#![allow(dead_code)]

use hedge_calculator::strategy::{FeeSchedule, Position, Quote};
use hedge_calculator::Side;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// Tolerance for comparing profit figures
pub const TOLERANCE: Decimal = dec!(0.000001);

/// 100 YES shares bought at 0.46
pub fn sample_position() -> Position {
    Position::new(Side::Yes, dec!(100), dec!(0.46)).expect("valid position")
}

/// Held market: YES 0.54/0.56, NO 0.44/0.46
pub fn sample_quote() -> Quote {
    Quote::new(dec!(0.56), dec!(0.54), dec!(0.46), dec!(0.44))
}

/// Opposite market: YES 0.53/0.55, NO 0.45/0.47
pub fn sample_opposite_quote() -> Quote {
    Quote::new(dec!(0.55), dec!(0.53), dec!(0.47), dec!(0.45))
}

/// Kalshi fee estimate: maker 2%, taker 5%, transaction 1%
pub fn sample_fees() -> FeeSchedule {
    FeeSchedule::new(dec!(0.02), dec!(0.05), dec!(0.01))
}

pub fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {} within {} of {}",
        actual,
        TOLERANCE,
        expected
    );
}

/// Kalshi GET /events/{ticker} body
pub fn kalshi_event_json(event_ticker: &str) -> Value {
    json!({
        "event": {
            "event_ticker": event_ticker,
            "series_ticker": "KXNBAGAME",
            "title": "Los Angeles L at Boston",
            "sub_title": "LAL at BOS (Oct 24)",
            "category": "Sports"
        },
        "markets": []
    })
}

/// Kalshi GET /markets?event_ticker= body with one market per team
pub fn kalshi_markets_json(event_ticker: &str) -> Value {
    json!({
        "cursor": "",
        "markets": [
            {
                "ticker": format!("{}-LAL", event_ticker),
                "event_ticker": event_ticker,
                "title": "Los Angeles L at Boston Winner?",
                "yes_sub_title": "Los Angeles L",
                "no_sub_title": "Los Angeles L",
                "status": "active",
                "yes_ask": 56,
                "yes_bid": 54,
                "no_ask": 46,
                "no_bid": 44,
                "last_price": 55,
                "volume": 125000,
                "close_time": "2025-10-25T03:00:00Z",
                "rules_primary": "If Los Angeles L wins, the market resolves to Yes."
            },
            {
                "ticker": format!("{}-BOS", event_ticker),
                "event_ticker": event_ticker,
                "title": "Los Angeles L at Boston Winner?",
                "yes_sub_title": "Boston",
                "no_sub_title": "Boston",
                "status": "active",
                "yes_ask": 45,
                "yes_bid": 43,
                "no_ask": 57,
                "no_bid": 55,
                "last_price": 44,
                "volume": 98000,
                "close_time": "2025-10-25T03:00:00Z",
                "rules_primary": "If Boston wins, the market resolves to Yes."
            }
        ]
    })
}

/// Gamma GET /markets body; outcome lists arrive JSON-encoded
pub fn gamma_markets_json() -> Value {
    json!([
        {
            "id": "516710",
            "question": "Lakers vs. Celtics",
            "conditionId": "0xabc",
            "slug": "lakers-vs-celtics",
            "description": "Resolves to Lakers if the Lakers win.",
            "endDate": "2025-10-25T03:00:00Z",
            "volume": "15230.55",
            "outcomes": "[\"Lakers\", \"Celtics\"]",
            "outcomePrices": "[\"0.62\", \"0.38\"]",
            "active": true,
            "closed": false
        }
    ])
}
