use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Role;
use crate::values::{Payoff, Price, TraderId};

/// A seat in a group before the market opens: who trades, and on which side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderSeat {
    pub id: TraderId,
    pub role: Role,
}

impl TraderSeat {
    pub fn new(id: TraderId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn buyer(id: TraderId) -> Self {
        Self::new(id, Role::Buyer)
    }

    pub fn seller(id: TraderId) -> Self {
        Self::new(id, Role::Seller)
    }
}

/// Live state of one participant in a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub id: TraderId,
    pub role: Role,
    /// Break-even point: max willingness to pay (buyer) or production cost (seller)
    pub reservation_value: Price,
    /// Current bid or ask. Sentinel values mean "not interested"
    pub quote: Price,
    /// Units held (buyer) or units left to sell (seller)
    pub inventory: u32,
    pub payoff: Payoff,
    /// (elapsed seconds, reservation value) after open and after every trade
    pub value_history: Vec<(i64, Price)>,
}

impl Trader {
    /// Create a buyer holding nothing, with no standing bid
    pub fn buyer(id: TraderId, reservation_value: Price, no_bid: Price) -> Self {
        Self {
            id,
            role: Role::Buyer,
            reservation_value,
            quote: no_bid,
            inventory: 0,
            payoff: Decimal::ZERO,
            value_history: vec![(0, reservation_value)],
        }
    }

    /// Create a seller with `stock` units and no standing ask
    pub fn seller(id: TraderId, reservation_value: Price, stock: u32, no_ask: Price) -> Self {
        Self {
            id,
            role: Role::Seller,
            reservation_value,
            quote: no_ask,
            inventory: stock,
            payoff: Decimal::ZERO,
            value_history: vec![(0, reservation_value)],
        }
    }

    pub fn is_buyer(&self) -> bool {
        self.role.is_buyer()
    }

    /// Whether a seller still has something to sell
    pub fn has_stock(&self) -> bool {
        self.inventory > 0
    }

    /// Surplus this trader would earn if a trade executed at `price`
    ///
    /// Computed in `Decimal`, so any pair of `i64` prices is representable.
    pub fn surplus_at(&self, price: Price) -> Payoff {
        let value = Decimal::from(self.reservation_value);
        let price = Decimal::from(price);
        match self.role {
            Role::Buyer => value - price,
            Role::Seller => price - value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_traders_start_idle() {
        let buyer = Trader::buyer(1, 90, 0);
        assert_eq!(buyer.quote, 0);
        assert_eq!(buyer.inventory, 0);
        assert_eq!(buyer.value_history, vec![(0, 90)]);

        let seller = Trader::seller(2, 30, 3, 111);
        assert_eq!(seller.quote, 111);
        assert!(seller.has_stock());
        assert_eq!(seller.payoff, Decimal::ZERO);
    }

    #[test]
    fn test_surplus_depends_on_role() {
        let buyer = Trader::buyer(1, 90, 0);
        let seller = Trader::seller(2, 30, 3, 111);
        assert_eq!(buyer.surplus_at(60), dec!(30));
        assert_eq!(seller.surplus_at(60), dec!(30));
        // Quoting past the break-even point is allowed and loses money
        assert_eq!(buyer.surplus_at(100), dec!(-10));
    }

    #[test]
    fn test_surplus_at_extreme_prices() {
        let buyer = Trader::buyer(1, 90, 0);
        let seller = Trader::seller(2, 30, 3, 111);
        assert_eq!(buyer.surplus_at(i64::MIN), dec!(9223372036854775898));
        assert_eq!(seller.surplus_at(i64::MIN), dec!(-9223372036854775838));
        assert_eq!(buyer.surplus_at(i64::MAX), dec!(-9223372036854775717));
    }
}
