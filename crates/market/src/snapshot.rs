use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use auction_core::{MarketConfig, News, Payoff, Price, Role, TraderId};
use rust_decimal::Decimal;

/// What one trader sees of the market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderView {
    /// Active bids, best (highest) first
    pub bids: Vec<Price>,
    /// Active asks, best (lowest) first
    pub asks: Vec<Price>,
    /// (elapsed seconds, price) of every trade so far
    pub trade_history: Vec<(i64, Price)>,
    pub inventory: u32,
    pub quote: Price,
    pub payoff: Payoff,
    pub reservation_value: Price,
}

impl TraderView {
    /// View of a seat whose market has not opened yet
    ///
    /// The book is empty and nobody is quoting. Reservation values are
    /// drawn at open, so it reads 0 until then.
    pub fn before_open(role: Role, config: &MarketConfig) -> Self {
        let (inventory, quote) = match role {
            Role::Buyer => (0, config.no_bid()),
            Role::Seller => (config.items_per_seller, config.no_ask()),
        };
        Self {
            bids: Vec::new(),
            asks: Vec::new(),
            trade_history: Vec::new(),
            inventory,
            quote,
            payoff: Decimal::ZERO,
            reservation_value: 0,
        }
    }
}

/// Result of a live update: every trader's view plus the trade it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveUpdate {
    pub views: BTreeMap<TraderId, TraderView>,
    pub news: Option<News>,
}

/// Message pushed to a single participant
#[derive(Debug, Clone, Serialize)]
pub struct TraderPayload<'a> {
    #[serde(flatten)]
    pub view: &'a TraderView,
    pub news: Option<News>,
}

impl LiveUpdate {
    pub fn view(&self, trader: TraderId) -> Option<&TraderView> {
        self.views.get(&trader)
    }

    pub fn payload_for(&self, trader: TraderId) -> Option<TraderPayload<'_>> {
        self.views.get(&trader).map(|view| TraderPayload {
            view,
            news: self.news,
        })
    }

    /// One payload per trader, ready to be broadcast to the group
    pub fn payloads(&self) -> BTreeMap<TraderId, TraderPayload<'_>> {
        self.views
            .iter()
            .map(|(id, view)| {
                (
                    *id,
                    TraderPayload {
                        view,
                        news: self.news,
                    },
                )
            })
            .collect()
    }
}
