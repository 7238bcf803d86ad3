//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{HedgeError, Result};
use crate::strategy::FeeSource;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. APP__FEES__TAKER_FEE)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("settings.partial_hedge_percents")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| HedgeError::Configuration(e.to_string()))?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| HedgeError::Configuration(e.to_string()))?;

    if let Some(fees) = app_config.fees.as_mut() {
        fees.validate()?;
        fees.source = FeeSource::Configured;
    }

    Ok(app_config)
}
