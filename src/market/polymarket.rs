//! REST client for the Polymarket Gamma API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::messages::GammaMarket;
use super::resolver::{MarketMetadata, QuoteSource, ResolvedQuotes};
use super::url::{MarketReference, PolymarketLookup};
use crate::common::errors::{HedgeError, Result};
use crate::common::types::Platform;
use crate::strategy::{FeeSchedule, Quote};

pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";

/// REST API client for Polymarket market discovery
#[derive(Debug, Clone)]
pub struct PolymarketRestClient {
    client: Client,
    /// Base URL for the Gamma API
    gamma_url: String,
}

impl PolymarketRestClient {
    pub fn new(gamma_url: &str) -> Result<Self> {
        Self::with_timeout(gamma_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(gamma_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HedgeError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            gamma_url: gamma_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up a single market by slug or id
    ///
    /// Gamma answers with a list; the first entry is used.
    #[instrument(skip(self))]
    pub async fn get_market(&self, lookup: &PolymarketLookup) -> Result<GammaMarket> {
        let url = format!("{}/markets", self.gamma_url);
        let (key, value) = match lookup {
            PolymarketLookup::Slug(slug) => ("slug", slug.as_str()),
            PolymarketLookup::Id(id) => ("id", id.as_str()),
        };
        debug!("Fetching market from Gamma API: {}?{}={}", url, key, value);

        let response = self.client.get(&url).query(&[(key, value)]).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(HedgeError::MarketNotFound(value.to_string()));
            }
            let body = response.text().await.unwrap_or_default();
            return Err(HedgeError::InvalidResponse(format!(
                "Gamma API returned status {}: {}",
                status, body
            )));
        }

        let markets: Vec<GammaMarket> = response.json().await?;
        markets
            .into_iter()
            .next()
            .ok_or_else(|| HedgeError::MarketNotFound(value.to_string()))
    }

    /// Fetch a market and build engine quotes from its outcome prices
    pub async fn resolve_quotes(&self, lookup: &PolymarketLookup) -> Result<ResolvedQuotes> {
        let market = self.get_market(lookup).await?;
        let (yes, no) = outcome_prices(&market)?;

        Ok(ResolvedQuotes {
            quote: Quote::new(yes, yes, no, no),
            // The NO outcome is the hedge instrument: its YES side trades at the NO price
            opposite_quote: Some(Quote::new(no, no, yes, yes)),
            fees: FeeSchedule::for_platform(Platform::Polymarket),
            metadata: market_metadata(&market),
        })
    }
}

#[async_trait]
impl QuoteSource for PolymarketRestClient {
    fn platform(&self) -> Platform {
        Platform::Polymarket
    }

    async fn resolve(
        &self,
        reference: &MarketReference,
        _team: Option<&str>,
    ) -> Result<ResolvedQuotes> {
        match reference {
            MarketReference::Polymarket { lookup } => self.resolve_quotes(lookup).await,
            other => Err(HedgeError::UnsupportedPlatform(other.platform().to_string())),
        }
    }
}

/// YES and NO prices from `outcomePrices`
pub fn outcome_prices(market: &GammaMarket) -> Result<(Decimal, Decimal)> {
    let prices = market.outcome_prices.as_deref().unwrap_or_default();
    if prices.len() < 2 {
        return Err(HedgeError::InvalidResponse(format!(
            "Market {} has {} outcome prices, expected 2",
            market.id,
            prices.len()
        )));
    }

    let parse = |raw: &str| {
        Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .map_err(|e| HedgeError::InvalidResponse(format!("Invalid outcome price {}: {}", raw, e)))
    };

    Ok((parse(&prices[0])?, parse(&prices[1])?))
}

fn market_metadata(market: &GammaMarket) -> MarketMetadata {
    let outcomes = market.outcomes.as_deref().unwrap_or_default();
    let label = |index: usize, fallback: &str| {
        outcomes
            .get(index)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };

    let close_time = market.end_date.as_deref().and_then(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| warn!(end_date = raw, error = %e, "Unparseable market end date"))
            .ok()
    });

    let status = match (market.active, market.closed) {
        (_, Some(true)) => "closed",
        (Some(false), _) => "inactive",
        _ => "open",
    };

    MarketMetadata {
        platform: Platform::Polymarket,
        title: market.question.clone(),
        subtitle: String::new(),
        yes_label: label(0, "YES"),
        no_label: label(1, "NO"),
        opposite_label: Some(label(1, "NO")),
        status: status.to_string(),
        close_time,
        volume: market.volume,
        rules: market.description.clone().unwrap_or_default(),
    }
}
