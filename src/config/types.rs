//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::market::kalshi::DEFAULT_KALSHI_REST_URL;
use crate::market::polymarket::DEFAULT_GAMMA_URL;
use crate::strategy::FeeSchedule;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Kalshi-specific configuration
    #[serde(default)]
    pub kalshi: KalshiConfig,
    /// Polymarket-specific configuration
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    /// Fee schedule override; platform estimates are used when absent
    #[serde(default)]
    pub fees: Option<FeeSchedule>,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Kalshi platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiConfig {
    /// Base URL for the trade REST API
    #[serde(default = "default_kalshi_rest_url")]
    pub rest_url: String,
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            rest_url: default_kalshi_rest_url(),
        }
    }
}

fn default_kalshi_rest_url() -> String {
    DEFAULT_KALSHI_REST_URL.to_string()
}

/// Polymarket platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolymarketConfig {
    /// Gamma API URL for market lookup
    #[serde(default = "default_polymarket_gamma_url")]
    pub gamma_url: String,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_polymarket_gamma_url(),
        }
    }
}

fn default_polymarket_gamma_url() -> String {
    DEFAULT_GAMMA_URL.to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Held YES ask + opposite YES ask above which a hedge is flagged as expensive
    #[serde(default = "default_spread_warning_threshold")]
    pub spread_warning_threshold: Decimal,
    /// Partial hedge sizes to compute, in percent of the perfect hedge
    #[serde(default = "default_partial_hedge_percents")]
    pub partial_hedge_percents: Vec<Decimal>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
            spread_warning_threshold: default_spread_warning_threshold(),
            partial_hedge_percents: default_partial_hedge_percents(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_spread_warning_threshold() -> Decimal {
    dec!(1.05)
}

fn default_partial_hedge_percents() -> Vec<Decimal> {
    vec![dec!(80), dec!(50), dec!(25)]
}
