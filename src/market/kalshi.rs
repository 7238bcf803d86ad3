//! REST client for the Kalshi Trade API

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::messages::{KalshiEvent, KalshiEventResponse, KalshiMarket, KalshiMarketsResponse};
use super::resolver::{MarketMetadata, QuoteSource, ResolvedQuotes};
use super::url::MarketReference;
use crate::common::errors::{HedgeError, Result};
use crate::common::types::Platform;
use crate::strategy::{FeeSchedule, Quote};

pub const DEFAULT_KALSHI_REST_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

/// REST API client for Kalshi (public endpoints only)
#[derive(Debug, Clone)]
pub struct KalshiRestClient {
    client: Client,
    base_url: String,
}

impl KalshiRestClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HedgeError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get event metadata
    #[instrument(skip(self))]
    pub async fn get_event(&self, event_ticker: &str) -> Result<KalshiEvent> {
        let url = format!("{}/events/{}", self.base_url, event_ticker);
        debug!("Fetching event from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(HedgeError::MarketNotFound(event_ticker.to_string()));
            }
            let body = response.text().await.unwrap_or_default();
            return Err(HedgeError::InvalidResponse(format!(
                "Kalshi event API returned status {}: {}",
                status, body
            )));
        }

        let event: KalshiEventResponse = response.json().await?;
        Ok(event.event)
    }

    /// Get every market listed under an event
    #[instrument(skip(self))]
    pub async fn get_markets(&self, event_ticker: &str) -> Result<Vec<KalshiMarket>> {
        let url = format!("{}/markets", self.base_url);
        debug!("Fetching markets for event {} from: {}", event_ticker, url);

        let response = self
            .client
            .get(&url)
            .query(&[("event_ticker", event_ticker)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HedgeError::InvalidResponse(format!(
                "Kalshi markets API returned status {}: {}",
                status, body
            )));
        }

        let markets: KalshiMarketsResponse = response.json().await?;
        Ok(markets.markets)
    }

    /// Fetch an event and build engine quotes for its target market
    #[instrument(skip(self))]
    pub async fn resolve_quotes(
        &self,
        event_ticker: &str,
        team: Option<&str>,
    ) -> Result<ResolvedQuotes> {
        let event = self.get_event(event_ticker).await?;
        let markets = self.get_markets(event_ticker).await?;

        let target = select_target_market(&markets, team).ok_or_else(|| {
            HedgeError::MarketNotFound(format!("No markets found for event {}", event_ticker))
        })?;
        let opposite = select_opposite_market(&markets, target);

        debug!(
            market = %target.ticker,
            opposite = opposite.map(|m| m.ticker.as_str()).unwrap_or("none"),
            "Selected Kalshi markets"
        );

        Ok(ResolvedQuotes {
            quote: market_quote(target),
            opposite_quote: opposite.map(market_quote),
            fees: FeeSchedule::for_platform(Platform::Kalshi),
            metadata: market_metadata(&event, target, opposite),
        })
    }
}

#[async_trait]
impl QuoteSource for KalshiRestClient {
    fn platform(&self) -> Platform {
        Platform::Kalshi
    }

    async fn resolve(
        &self,
        reference: &MarketReference,
        team: Option<&str>,
    ) -> Result<ResolvedQuotes> {
        match reference {
            MarketReference::Kalshi { event_ticker } => self.resolve_quotes(event_ticker, team).await,
            other => Err(HedgeError::UnsupportedPlatform(other.platform().to_string())),
        }
    }
}

/// Pick the market the user holds
///
/// Preference order: a market whose outcome label equals `team`, then the
/// first market with realistic pricing, then the first market.
pub fn select_target_market<'a>(
    markets: &'a [KalshiMarket],
    team: Option<&str>,
) -> Option<&'a KalshiMarket> {
    if let Some(team) = team {
        if let Some(market) = markets.iter().find(|m| m.matches_team(team)) {
            return Some(market);
        }
        debug!(team, "No market matches team, falling back to pricing");
    }

    if let Some(market) = markets.iter().find(|m| m.has_realistic_pricing()) {
        return Some(market);
    }

    let first = markets.first()?;
    warn!(ticker = %first.ticker, "No market with realistic pricing, using first available");
    Some(first)
}

/// First market under the event with a different ticker than `target`
pub fn select_opposite_market<'a>(
    markets: &'a [KalshiMarket],
    target: &KalshiMarket,
) -> Option<&'a KalshiMarket> {
    markets.iter().find(|m| m.ticker != target.ticker)
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn market_quote(market: &KalshiMarket) -> Quote {
    Quote::new(
        cents(market.yes_ask_or_price()),
        cents(market.yes_bid),
        cents(market.no_ask_or_price()),
        cents(market.no_bid),
    )
}

fn market_metadata(
    event: &KalshiEvent,
    target: &KalshiMarket,
    opposite: Option<&KalshiMarket>,
) -> MarketMetadata {
    let title = if event.title.is_empty() {
        target.title.clone()
    } else {
        event.title.clone()
    };

    MarketMetadata {
        platform: Platform::Kalshi,
        title,
        subtitle: if target.subtitle.is_empty() {
            event.sub_title.clone()
        } else {
            target.subtitle.clone()
        },
        yes_label: target
            .yes_sub_title
            .clone()
            .unwrap_or_else(|| "YES".to_string()),
        no_label: target
            .no_sub_title
            .clone()
            .unwrap_or_else(|| "NO".to_string()),
        opposite_label: opposite.and_then(|m| m.yes_sub_title.clone()),
        status: target.status.clone(),
        close_time: target.close_time,
        volume: Some(Decimal::from(target.volume)),
        rules: target.rules_primary.clone(),
    }
}
