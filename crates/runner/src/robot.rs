//! Robots - Zero-intelligence constrained traders
//!
//! Robots quote uniformly at random but never against their own interest:
//! - Buyers bid between 1 and their current valuation
//! - Sellers ask between their production cost and the highest valuation
//!
//! They are used to exercise sessions without human participants.

use auction_core::{GroupId, MarketConfig, Price, Role, TraderId};
use double_auction::TraderView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Robot standing in for one participant
pub struct RobotTrader {
    pub group_id: GroupId,
    pub trader_id: TraderId,
    pub role: Role,
    /// Quotes submitted so far
    pub quotes_sent: u64,
    rng: StdRng,
}

impl RobotTrader {
    pub fn new(group_id: GroupId, trader_id: TraderId, role: Role) -> Self {
        Self {
            group_id,
            trader_id,
            role,
            quotes_sent: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a specific seed for reproducible quote streams
    pub fn with_seed(group_id: GroupId, trader_id: TraderId, role: Role, seed: u64) -> Self {
        Self {
            group_id,
            trader_id,
            role,
            quotes_sent: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next quote given the trader's current view, or None to stay out
    pub fn next_quote(&mut self, view: &TraderView, config: &MarketConfig) -> Option<Price> {
        let (low, high) = match self.role {
            Role::Buyer => (config.no_bid() + 1, view.reservation_value),
            Role::Seller if view.inventory == 0 => return None,
            Role::Seller => (view.reservation_value, config.valuation_max),
        };
        if low > high {
            return None;
        }

        self.quotes_sent += 1;
        Some(self.rng.gen_range(low..=high))
    }
}
