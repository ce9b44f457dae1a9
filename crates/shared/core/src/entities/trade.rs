use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{GroupId, Price, TraderId};

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// Executed transaction between one buyer and one seller
///
/// Trades are immutable once recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub group_id: GroupId,
    pub buyer: TraderId,
    pub seller: TraderId,
    pub price: Price,
    /// Whole seconds since the market opened
    pub seconds: i64,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        group_id: GroupId,
        buyer: TraderId,
        seller: TraderId,
        price: Price,
        seconds: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            buyer,
            seller,
            price,
            seconds,
            timestamp,
        }
    }

    /// Public part of the trade, announced to every participant
    pub fn news(&self) -> News {
        News {
            buyer: self.buyer,
            seller: self.seller,
            price: self.price,
        }
    }
}

/// Announcement of a trade that just executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub buyer: TraderId,
    pub seller: TraderId,
    pub price: Price,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_carries_public_fields_only() {
        let trade = Trade::new(1, 1, 2, 60, 12, Utc::now());
        let json = serde_json::to_value(trade.news()).unwrap();
        assert_eq!(json, serde_json::json!({"buyer": 1, "seller": 2, "price": 60}));
    }
}
