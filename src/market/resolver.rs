//! Quote resolution: turns a market reference into engine inputs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument};

use super::kalshi::KalshiRestClient;
use super::polymarket::PolymarketRestClient;
use super::url::{parse_market_url, MarketReference};
use crate::common::errors::{HedgeError, Result};
use crate::common::types::Platform;
use crate::config::types::AppConfig;
use crate::strategy::{FeeSchedule, Quote};

/// Descriptive data about the resolved market, for display only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketMetadata {
    pub platform: Platform,
    pub title: String,
    pub subtitle: String,
    /// What a YES share pays out on
    pub yes_label: String,
    pub no_label: String,
    /// YES label of the complementary market, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opposite_label: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rules: String,
}

/// Everything the strategy engine needs, as fetched from a platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuotes {
    pub quote: Quote,
    pub opposite_quote: Option<Quote>,
    pub fees: FeeSchedule,
    pub metadata: MarketMetadata,
}

/// Trait for platform quote sources (Kalshi, Polymarket, etc.)
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Platform this source can resolve references for
    fn platform(&self) -> Platform;

    /// Fetch normalized quotes for a market
    ///
    /// # Arguments
    /// * `reference` - Market parsed from the user's URL
    /// * `team` - Optional outcome label used to pick among sibling markets
    async fn resolve(&self, reference: &MarketReference, team: Option<&str>)
        -> Result<ResolvedQuotes>;
}

/// Boxed quote source for dynamic dispatch
pub type BoxedQuoteSource = Box<dyn QuoteSource>;

/// Dispatches market references to the source for their platform
pub struct MarketResolver {
    sources: Vec<BoxedQuoteSource>,
    fee_override: Option<FeeSchedule>,
}

impl MarketResolver {
    /// Resolver with no sources registered
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            fee_override: None,
        }
    }

    /// Resolver backed by the Kalshi and Polymarket REST clients
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.settings.request_timeout_seconds);
        let kalshi = KalshiRestClient::with_timeout(&config.kalshi.rest_url, timeout)?;
        let polymarket = PolymarketRestClient::with_timeout(&config.polymarket.gamma_url, timeout)?;

        Ok(Self::new()
            .with_source(Box::new(kalshi))
            .with_source(Box::new(polymarket))
            .with_fee_override(config.fees.clone()))
    }

    pub fn with_source(mut self, source: BoxedQuoteSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the platform fee estimate on every resolved quote
    pub fn with_fee_override(mut self, fees: Option<FeeSchedule>) -> Self {
        self.fee_override = fees;
        self
    }

    /// Resolve quotes for an already-parsed reference
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        reference: &MarketReference,
        team: Option<&str>,
    ) -> Result<ResolvedQuotes> {
        let platform = reference.platform();
        let source = self
            .sources
            .iter()
            .find(|source| source.platform() == platform)
            .ok_or_else(|| HedgeError::UnsupportedPlatform(platform.to_string()))?;

        let mut resolved = source.resolve(reference, team).await?;
        if let Some(fees) = &self.fee_override {
            resolved.fees = fees.clone();
        }

        info!(
            %platform,
            title = %resolved.metadata.title,
            hedgeable = resolved.opposite_quote.is_some(),
            "Resolved market quotes"
        );
        Ok(resolved)
    }

    /// Parse a market URL and resolve its quotes
    pub async fn resolve_url(&self, url: &str, team: Option<&str>) -> Result<ResolvedQuotes> {
        let reference = parse_market_url(url)?;
        self.resolve(&reference, team).await
    }
}

impl Default for MarketResolver {
    fn default() -> Self {
        Self::new()
    }
}
