//! Auction Core Domain
//!
//! Pure domain types for the continuous double auction.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod config;
pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use config::{ConfigError, MarketConfig};
pub use entities::{News, Role, Trade, TradeId, Trader, TraderSeat};
pub use values::{GroupId, Payoff, Price, Timestamp, TraderId};
