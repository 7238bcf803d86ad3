//! HedgeCalculator - Main Entry Point
//!
//! Resolves live quotes for a Kalshi or Polymarket market and prints the
//! exit and hedge strategies for a position in it.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hedge_calculator::config::load_config;
use hedge_calculator::report::HedgeReport;
use hedge_calculator::{HedgeCalculator, MarketResolver, Position, PositionSize, Side};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("size").required(true).args(["shares", "dollars"])))]
struct Args {
    /// Kalshi or Polymarket market URL
    #[arg(long)]
    url: String,

    /// Outcome label of the market you hold (Kalshi events with several markets)
    #[arg(long)]
    team: Option<String>,

    /// Side you hold (YES or NO)
    #[arg(long)]
    side: Side,

    /// Position size in contracts
    #[arg(long)]
    shares: Option<Decimal>,

    /// Position size in dollars spent; converted to whole contracts
    #[arg(long)]
    dollars: Option<Decimal>,

    /// Price paid per share, between 0 and 1
    #[arg(long)]
    buy_price: Decimal,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "HEDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the strategies as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config)).context("Failed to load configuration")?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.settings.log_level);
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Configuration file: {}", args.config);

    let size = match (args.shares, args.dollars) {
        (Some(shares), _) => PositionSize::Contracts(shares),
        (None, Some(dollars)) => PositionSize::Dollars(dollars),
        (None, None) => anyhow::bail!("Either --shares or --dollars is required"),
    };
    let position = Position::from_size(args.side, size, args.buy_price)?;

    let resolver = MarketResolver::from_config(&config)?;
    let resolved = resolver
        .resolve_url(&args.url, args.team.as_deref())
        .await
        .with_context(|| format!("Failed to fetch market data for {}", args.url))?;

    let calculator = HedgeCalculator::from_settings(&config.settings)?;
    let strategies = calculator.compute_strategies(
        &position,
        &resolved.quote,
        resolved.opposite_quote.as_ref(),
        &resolved.fees,
    )?;

    let report = HedgeReport {
        market: Some(&resolved.metadata),
        position: &position,
        strategies: &strategies,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
