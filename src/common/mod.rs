//! Types and errors shared by the strategy engine and the market-data clients

pub mod errors;
pub mod types;
