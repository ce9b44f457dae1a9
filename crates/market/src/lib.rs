//! Continuous double auction
//!
//! A market holds the buyers and sellers of one group. Every quote update
//! is matched against the opposite side and settled before the call
//! returns; executed trades land in an append-only ledger.
//!
//! ```text
//!   quote ──► Market::submit_quote ──► MatchingPolicy::find_match
//!                     │                         │
//!                     │◄──────── candidate ─────┘
//!                     ▼
//!                 settlement ──► TradeLedger
//!                     │
//!                     ▼
//!            LiveUpdate (views + news)
//! ```

pub mod error;
pub mod ledger;
pub mod market;
pub mod message;
pub mod snapshot;

// Re-export main types for convenience
pub use error::{MarketError, Result};
pub use ledger::TradeLedger;
pub use market::Market;
pub use snapshot::{LiveUpdate, TraderPayload, TraderView};

pub use auction_core::{
    GroupId, MarketConfig, News, Payoff, Price, Role, Timestamp, Trade, Trader, TraderId,
    TraderSeat,
};
