use auction_core::Trader;

/// Positions of a compatible buyer/seller pair in the group's trader list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub buyer: usize,
    pub seller: usize,
}

/// Port for quote matching policies
///
/// A policy decides which counterparty, if any, trades with a trader
/// that just updated its quote.
pub trait MatchingPolicy: Send + Sync {
    /// Check if a buyer and a seller can trade at their current quotes
    fn can_match(&self, buyer: &Trader, seller: &Trader) -> bool;

    /// Find a counterparty for `traders[incoming]`
    ///
    /// `traders` is in group membership order.
    fn find_match(&self, traders: &[Trader], incoming: usize) -> Option<MatchCandidate>;
}
