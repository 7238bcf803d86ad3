//! Error types for the application

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using our HedgeError
pub type Result<T> = std::result::Result<T, HedgeError>;

/// Main error type for calculator and quote-resolution operations
#[derive(Error, Debug)]
pub enum HedgeError {
    /// Position failed validation; `field` names the offending input
    #[error("Invalid position ({field}): {reason}")]
    InvalidPosition { field: &'static str, reason: String },

    /// Partial hedge percentage outside 0..=100
    #[error("Invalid hedge percent: {0} (expected a value from 0 to 100)")]
    InvalidHedgePercent(Decimal),

    /// A figure exceeded the decimal range (only reachable with absurd quotes)
    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    /// Market URL could not be parsed
    #[error("Invalid market URL: {0}")]
    InvalidMarketUrl(String),

    /// Market URL points at a platform we have no client for
    #[error("Unsupported platform: {0}. Please use Kalshi or Polymarket URLs")]
    UnsupportedPlatform(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Market not found
    #[error("Market not found: {0}")]
    MarketNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HedgeError {
    pub fn invalid_position(field: &'static str, reason: impl Into<String>) -> Self {
        HedgeError::InvalidPosition {
            field,
            reason: reason.into(),
        }
    }
}

/// Why a hedge-family strategy could not be computed
///
/// This is not fatal: the exit strategy is still produced and the hedge
/// entries carry this reason instead of a result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum HedgeUnavailable {
    #[error("no quote is available for the opposite market")]
    MissingOppositeQuote,

    #[error("opposite market ask of {price} cannot be used as a hedge price")]
    NonPositiveHedgePrice { price: Decimal },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_position_names_field() {
        let err = HedgeError::invalid_position("buy_price", "must be below 1");
        assert_eq!(err.to_string(), "Invalid position (buy_price): must be below 1");
        assert!(matches!(err, HedgeError::InvalidPosition { field: "buy_price", .. }));
    }

    #[test]
    fn test_hedge_unavailable_messages() {
        assert_eq!(
            HedgeUnavailable::MissingOppositeQuote.to_string(),
            "no quote is available for the opposite market"
        );
        let reason = HedgeUnavailable::NonPositiveHedgePrice { price: dec!(0) };
        assert!(reason.to_string().contains("cannot be used as a hedge price"));
    }
}
