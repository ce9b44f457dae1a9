use auction_core::{Role, Trader};
use auction_ports::{MatchCandidate, MatchingPolicy};

/// First-fit matching against the opposite side
///
/// Only the trader that just moved is matched:
/// 1. A buyer is checked against every seller, in group order
/// 2. A seller is checked against every buyer, in group order
///
/// The first compatible counterparty wins, even if a later one quotes a
/// better price.
pub struct FirstFitMatcher;

impl FirstFitMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FirstFitMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingPolicy for FirstFitMatcher {
    fn can_match(&self, buyer: &Trader, seller: &Trader) -> bool {
        buyer.role == Role::Buyer
            && seller.role == Role::Seller
            && seller.has_stock()
            && seller.quote <= buyer.quote
    }

    fn find_match(&self, traders: &[Trader], incoming: usize) -> Option<MatchCandidate> {
        let mover = traders.get(incoming)?;

        let pair = |other: usize| match mover.role {
            Role::Buyer => MatchCandidate {
                buyer: incoming,
                seller: other,
            },
            Role::Seller => MatchCandidate {
                buyer: other,
                seller: incoming,
            },
        };

        traders
            .iter()
            .enumerate()
            .filter(|(_, t)| t.role == mover.role.opposite())
            .map(|(idx, _)| pair(idx))
            .find(|c| self.can_match(&traders[c.buyer], &traders[c.seller]))
    }
}
