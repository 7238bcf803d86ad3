//! REST response types for Kalshi and the Polymarket Gamma API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Kalshi Trade API v2
// ============================================================================

/// Response from GET /events/{event_ticker}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiEventResponse {
    pub event: KalshiEvent,
}

/// Event metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiEvent {
    pub event_ticker: String,
    #[serde(default)]
    pub series_ticker: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "subtitle")]
    pub sub_title: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Response from GET /markets?event_ticker=...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiMarketsResponse {
    #[serde(default)]
    pub markets: Vec<KalshiMarket>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A single Kalshi market; prices are in cents (0-100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiMarket {
    pub ticker: String,
    #[serde(default)]
    pub event_ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub yes_sub_title: Option<String>,
    #[serde(default)]
    pub no_sub_title: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub yes_bid: i64,
    #[serde(default)]
    pub yes_ask: i64,
    #[serde(default)]
    pub no_bid: i64,
    #[serde(default)]
    pub no_ask: i64,
    #[serde(default)]
    pub yes_price: i64,
    #[serde(default)]
    pub no_price: i64,
    #[serde(default)]
    pub last_price: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub rules_primary: String,
    #[serde(default)]
    pub rules_secondary: String,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<String>,
}

impl KalshiMarket {
    /// At least one side is quoted strictly between 0 and 100 cents
    ///
    /// Resolved or untraded markets show every price at 0 or 100.
    pub fn has_realistic_pricing(&self) -> bool {
        let realistic = |cents: i64| cents > 0 && cents < 100;
        realistic(self.yes_ask) || realistic(self.no_ask)
    }

    /// YES ask, or the listed YES price when no ask is posted
    pub fn yes_ask_or_price(&self) -> i64 {
        if self.yes_ask > 0 {
            self.yes_ask
        } else {
            self.yes_price.max(0)
        }
    }

    /// NO ask, or the listed NO price when no ask is posted
    pub fn no_ask_or_price(&self) -> i64 {
        if self.no_ask > 0 {
            self.no_ask
        } else {
            self.no_price.max(0)
        }
    }

    /// True when either outcome label matches `team`
    pub fn matches_team(&self, team: &str) -> bool {
        self.yes_sub_title.as_deref() == Some(team) || self.no_sub_title.as_deref() == Some(team)
    }
}

// ============================================================================
// Gamma API (Market Discovery)
// ============================================================================

/// Market from the Gamma API
///
/// `outcomes` and `outcomePrices` arrive either as JSON arrays or as
/// JSON-encoded strings holding an array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GammaMarket {
    pub id: String,
    pub question: String,
    #[serde(default, alias = "conditionId")]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub outcomes: Option<Vec<String>>,
    #[serde(
        rename = "outcomePrices",
        default,
        deserialize_with = "deserialize_string_list"
    )]
    pub outcome_prices: Option<Vec<String>>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub closed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    List(Vec<serde_json::Value>),
    Encoded(String),
}

fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<StringList>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(StringList::List(values)) => values,
        Some(StringList::Encoded(encoded)) => {
            serde_json::from_str::<Vec<serde_json::Value>>(&encoded).map_err(serde::de::Error::custom)?
        }
    };

    Ok(Some(
        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_gamma_market_encoded_lists() {
        let json = r#"{
            "id": "516710",
            "question": "Lakers vs. Celtics",
            "slug": "lakers-vs-celtics",
            "endDate": "2025-01-20T03:00:00Z",
            "volume": "15230.55",
            "outcomes": "[\"Lakers\", \"Celtics\"]",
            "outcomePrices": "[\"0.535\", \"0.465\"]",
            "active": true,
            "closed": false
        }"#;

        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.outcomes, Some(vec!["Lakers".to_string(), "Celtics".to_string()]));
        assert_eq!(
            market.outcome_prices,
            Some(vec!["0.535".to_string(), "0.465".to_string()])
        );
        assert_eq!(market.volume, Some(dec!(15230.55)));
    }

    #[test]
    fn test_gamma_market_plain_lists() {
        let json = r#"{
            "id": "1",
            "question": "Will it rain?",
            "outcomes": ["Yes", "No"],
            "outcomePrices": [0.62, 0.38]
        }"#;

        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.outcome_prices, Some(vec!["0.62".to_string(), "0.38".to_string()]));
        assert!(market.volume.is_none());
    }

    #[test]
    fn test_kalshi_market_defaults() {
        let json = r#"{"ticker": "KXNBA-25LAL-LAL", "yes_ask": 55, "yes_bid": 53}"#;
        let market: KalshiMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.no_ask, 0);
        assert!(market.has_realistic_pricing());
        assert!(market.close_time.is_none());
    }

    #[test]
    fn test_kalshi_unrealistic_pricing() {
        let json = r#"{"ticker": "T", "yes_ask": 100, "no_ask": 0}"#;
        let market: KalshiMarket = serde_json::from_str(json).unwrap();
        assert!(!market.has_realistic_pricing());
    }

    #[test]
    fn test_kalshi_ask_falls_back_to_price() {
        let json = r#"{"ticker": "T", "yes_ask": 0, "yes_price": 61, "no_ask": 40, "no_price": 39}"#;
        let market: KalshiMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.yes_ask_or_price(), 61);
        assert_eq!(market.no_ask_or_price(), 40);

        let bare: KalshiMarket = serde_json::from_str(r#"{"ticker": "T"}"#).unwrap();
        assert_eq!(bare.yes_ask_or_price(), 0);
        assert_eq!(bare.no_ask_or_price(), 0);
    }
}
