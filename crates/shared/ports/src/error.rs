use auction_core::{ConfigError, TraderId};
use thiserror::Error;

/// Errors raised by market operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Unknown trader: {0}")]
    UnknownTrader(TraderId),

    #[error("Trader {0} appears more than once")]
    DuplicateTrader(TraderId),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Invalid market configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type MarketResult<T> = std::result::Result<T, MarketError>;
