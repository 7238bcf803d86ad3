//! Market URL parsing and platform detection

use serde::Serialize;
use url::Url;

use crate::common::errors::{HedgeError, Result};
use crate::common::types::Platform;

/// How a Polymarket market is looked up on the Gamma API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum PolymarketLookup {
    Slug(String),
    Id(String),
}

/// A market identified from a user-supplied URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum MarketReference {
    Kalshi { event_ticker: String },
    Polymarket { lookup: PolymarketLookup },
}

impl MarketReference {
    pub fn platform(&self) -> Platform {
        match self {
            MarketReference::Kalshi { .. } => Platform::Kalshi,
            MarketReference::Polymarket { .. } => Platform::Polymarket,
        }
    }
}

/// Extract platform and identifier from a market URL
///
/// Supported formats:
/// - `https://kalshi.com/markets/<series>/<event>/<ticker>`: the last path
///   segment, upper-cased, is the event ticker
/// - `https://polymarket.com/event/<slug>`: looked up by slug (the last
///   segment after `/event/` when an event page links a specific market)
/// - `https://polymarket.com/markets?id=<id>`: looked up by id
pub fn parse_market_url(raw: &str) -> Result<MarketReference> {
    let url = Url::parse(raw.trim())
        .map_err(|e| HedgeError::InvalidMarketUrl(format!("{}: {}", raw, e)))?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    if host == "kalshi.com" || host.ends_with(".kalshi.com") {
        let ticker = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_default();

        if ticker.is_empty() || ticker.eq_ignore_ascii_case("markets") {
            return Err(HedgeError::InvalidMarketUrl(format!(
                "Invalid Kalshi URL format: {}",
                raw
            )));
        }

        return Ok(MarketReference::Kalshi {
            event_ticker: ticker.to_ascii_uppercase(),
        });
    }

    if host == "polymarket.com" || host.ends_with(".polymarket.com") {
        if let Some((_, rest)) = url.path().split_once("/event/") {
            if let Some(slug) = rest.split('/').filter(|s| !s.is_empty()).last() {
                return Ok(MarketReference::Polymarket {
                    lookup: PolymarketLookup::Slug(slug.to_string()),
                });
            }
        }

        if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "id") {
            if !id.is_empty() {
                return Ok(MarketReference::Polymarket {
                    lookup: PolymarketLookup::Id(id.into_owned()),
                });
            }
        }

        return Err(HedgeError::InvalidMarketUrl(format!(
            "Invalid Polymarket URL format: {}",
            raw
        )));
    }

    Err(HedgeError::UnsupportedPlatform(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kalshi_url() {
        let reference =
            parse_market_url("https://kalshi.com/markets/kxmlbgame/mlb-game/kxmlbgame-25oct24ladtor")
                .unwrap();
        assert_eq!(
            reference,
            MarketReference::Kalshi {
                event_ticker: "KXMLBGAME-25OCT24LADTOR".to_string()
            }
        );
        assert_eq!(reference.platform(), Platform::Kalshi);
    }

    #[test]
    fn test_kalshi_url_trailing_slash() {
        let reference = parse_market_url("https://kalshi.com/markets/kxnba/kxnba-25lal/").unwrap();
        assert_eq!(
            reference,
            MarketReference::Kalshi {
                event_ticker: "KXNBA-25LAL".to_string()
            }
        );
    }

    #[test]
    fn test_kalshi_url_without_ticker() {
        assert!(matches!(
            parse_market_url("https://kalshi.com/markets"),
            Err(HedgeError::InvalidMarketUrl(_))
        ));
    }

    #[test]
    fn test_polymarket_slug_url() {
        let reference =
            parse_market_url("https://polymarket.com/event/lakers-vs-celtics?tid=123").unwrap();
        assert_eq!(
            reference,
            MarketReference::Polymarket {
                lookup: PolymarketLookup::Slug("lakers-vs-celtics".to_string())
            }
        );
    }

    #[test]
    fn test_polymarket_nested_market_slug() {
        let reference =
            parse_market_url("https://polymarket.com/event/nba-finals/will-the-lakers-win").unwrap();
        assert_eq!(
            reference,
            MarketReference::Polymarket {
                lookup: PolymarketLookup::Slug("will-the-lakers-win".to_string())
            }
        );
    }

    #[test]
    fn test_polymarket_id_url() {
        let reference = parse_market_url("https://polymarket.com/markets?id=516710").unwrap();
        assert_eq!(reference.platform(), Platform::Polymarket);
        assert_eq!(
            reference,
            MarketReference::Polymarket {
                lookup: PolymarketLookup::Id("516710".to_string())
            }
        );
    }

    #[test]
    fn test_polymarket_url_without_identifier() {
        assert!(matches!(
            parse_market_url("https://polymarket.com/markets"),
            Err(HedgeError::InvalidMarketUrl(_))
        ));
    }

    #[test]
    fn test_unsupported_platform() {
        assert!(matches!(
            parse_market_url("https://example.com/markets/abc"),
            Err(HedgeError::UnsupportedPlatform(host)) if host == "example.com"
        ));
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(
            parse_market_url("kalshi markets"),
            Err(HedgeError::InvalidMarketUrl(_))
        ));
    }
}
