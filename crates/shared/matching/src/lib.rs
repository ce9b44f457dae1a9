//! Auction Matching Policies
//!
//! Implementations of quote matching for the continuous double auction.

mod first_fit;

pub use first_fit::FirstFitMatcher;

// Re-export the trait from ports for convenience
pub use auction_ports::{MatchCandidate, MatchingPolicy};
