//! Market data collaborators
//!
//! Everything that talks to a marketplace lives here: URL parsing, the
//! Kalshi and Polymarket REST clients, and the resolver that turns a
//! market link into quotes for the strategy engine.

pub mod kalshi;
pub mod messages;
pub mod polymarket;
pub mod resolver;
pub mod url;

pub use kalshi::KalshiRestClient;
pub use polymarket::PolymarketRestClient;
pub use resolver::{BoxedQuoteSource, MarketMetadata, MarketResolver, QuoteSource, ResolvedQuotes};
pub use url::{parse_market_url, MarketReference, PolymarketLookup};
