use auction_core::{ConfigError, GroupId};
use double_auction::MarketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("Trading has not started in group {0}")]
    TradingNotStarted(GroupId),

    #[error("Trading window closed in group {0}")]
    TradingClosed(GroupId),

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Robot task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
