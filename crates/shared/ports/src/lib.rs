//! Auction Ports
//!
//! Port definitions (traits) for the continuous double auction.
//! These define the boundaries between market logic and infrastructure.

mod clock;
mod error;
mod matching;

pub use clock::Clock;
pub use error::{MarketError, MarketResult};
pub use matching::{MatchCandidate, MatchingPolicy};
