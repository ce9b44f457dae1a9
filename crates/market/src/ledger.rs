use auction_core::{Price, Trade, TraderId};

/// Append-only record of the trades executed in one group
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// (elapsed seconds, price) of every trade in execution order
    pub fn price_history(&self) -> Vec<(i64, Price)> {
        self.trades.iter().map(|t| (t.seconds, t.price)).collect()
    }

    /// Trades in which `trader` took part on either side
    pub fn trades_of(&self, trader: TraderId) -> impl Iterator<Item = &Trade> {
        self.trades
            .iter()
            .filter(move |t| t.buyer == trader || t.seller == trader)
    }
}
