use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use auction_core::{
    GroupId, MarketConfig, News, Price, Role, Timestamp, Trade, Trader, TraderId, TraderSeat,
};
use auction_matching::FirstFitMatcher;
use auction_ports::{Clock, MatchCandidate, MatchingPolicy};
use chrono::Duration;
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::StdRng;
use serde_json::Value;

use crate::error::{MarketError, Result};
use crate::ledger::TradeLedger;
use crate::message;
use crate::snapshot::{LiveUpdate, TraderView};

/// Continuous double auction for one group
///
/// Every call that changes state runs to completion before returning:
/// a quote update is matched and, if a counterparty exists, settled in the
/// same call. Callers sharing a market across tasks must serialize access.
pub struct Market<R = StdRng> {
    group_id: GroupId,
    config: MarketConfig,
    /// Traders in group membership order
    traders: Vec<Trader>,
    ledger: TradeLedger,
    matcher: Box<dyn MatchingPolicy>,
    clock: Arc<dyn Clock>,
    opened_at: Timestamp,
    /// Source for reservation value draws
    rng: R,
}

impl<R: Rng> Market<R> {
    /// Open a market for the given seats
    ///
    /// Buyers draw a valuation and sellers a production cost, uniformly
    /// from the configured ranges. Buyers start with nothing and sellers
    /// with `items_per_seller` units; nobody is quoting yet.
    pub fn open(
        group_id: GroupId,
        seats: &[TraderSeat],
        config: MarketConfig,
        clock: Arc<dyn Clock>,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        if let Some(dup) = seats.iter().find(|seat| !seen.insert(seat.id)) {
            return Err(MarketError::DuplicateTrader(dup.id));
        }

        let traders: Vec<Trader> = seats
            .iter()
            .map(|seat| match seat.role {
                Role::Buyer => Trader::buyer(
                    seat.id,
                    rng.gen_range(config.valuation_min..=config.valuation_max),
                    config.no_bid(),
                ),
                Role::Seller => Trader::seller(
                    seat.id,
                    rng.gen_range(config.production_costs_min..=config.production_costs_max),
                    config.items_per_seller,
                    config.no_ask(),
                ),
            })
            .collect();

        let opened_at = clock.now();
        info!(
            "Market opened: group={}, buyers={}, sellers={}, window={}s",
            group_id,
            traders.iter().filter(|t| t.is_buyer()).count(),
            traders.iter().filter(|t| !t.is_buyer()).count(),
            config.trading_window_secs
        );

        Ok(Self {
            group_id,
            config,
            traders,
            ledger: TradeLedger::new(),
            matcher: Box::new(FirstFitMatcher::new()),
            clock,
            opened_at,
            rng,
        })
    }

    /// Replace a trader's quote and try to match it
    ///
    /// The quote is not checked against the trader's reservation value.
    /// Returns the executed trade, if any.
    pub fn submit_quote(&mut self, trader_id: TraderId, price: Price) -> Result<Option<Trade>> {
        let idx = self.position(trader_id)?;

        let trader = &mut self.traders[idx];
        trader.quote = price;
        debug!(
            "Quote update: group={}, trader={}, role={:?}, price={}",
            self.group_id, trader_id, trader.role, price
        );

        let Some(candidate) = self.matcher.find_match(&self.traders, idx) else {
            return Ok(None);
        };

        Ok(Some(self.settle(candidate)))
    }

    /// Submit a quote typed as text
    ///
    /// Text that is not an integer is rejected with `InvalidQuote` and
    /// leaves the market untouched.
    pub fn submit_raw_quote(&mut self, trader_id: TraderId, raw_price: &str) -> Result<LiveUpdate> {
        self.position(trader_id)?;

        let price = message::parse_price(raw_price).inspect_err(|_| {
            warn!(
                "Invalid quote received: group={}, trader={}, raw={:?}",
                self.group_id, trader_id, raw_price
            )
        })?;

        let trade = self.submit_quote(trader_id, price)?;
        Ok(self.live_update(trade.map(|t| t.news())))
    }

    /// Handle a live message from a participant's page
    ///
    /// Messages without a quote only refresh the views.
    pub fn handle_message(&mut self, trader_id: TraderId, data: &Value) -> Result<LiveUpdate> {
        self.position(trader_id)?;

        let offer = message::parse_offer(data).inspect_err(|_| {
            warn!(
                "Invalid message received: group={}, trader={}, data={}",
                self.group_id, trader_id, data
            )
        })?;

        let news = match offer {
            Some(price) => self.submit_quote(trader_id, price)?.map(|t| t.news()),
            None => None,
        };
        Ok(self.live_update(news))
    }

    /// Execute a trade between a matched buyer and seller
    fn settle(&mut self, candidate: MatchCandidate) -> Trade {
        let now = self.clock.now();
        let seconds = self.elapsed_seconds_at(now);
        let price = self.traders[candidate.buyer].quote;
        let buyer_gain = self.traders[candidate.buyer].surplus_at(price);
        let seller_gain = self.traders[candidate.seller].surplus_at(price);

        let trade = Trade::new(
            self.group_id,
            self.traders[candidate.buyer].id,
            self.traders[candidate.seller].id,
            price,
            seconds,
            now,
        );
        self.ledger.record(trade.clone());

        let valuation_min = self.config.valuation_min;

        let buyer = &mut self.traders[candidate.buyer];
        buyer.inventory += 1;
        buyer.payoff += buyer_gain;
        buyer.quote = self.config.no_bid();
        // Each further unit is worth at most as much as the last one
        let ceiling = buyer.reservation_value.max(valuation_min);
        buyer.reservation_value = self.rng.gen_range(valuation_min..=ceiling);
        buyer.value_history.push((seconds, buyer.reservation_value));

        let seller = &mut self.traders[candidate.seller];
        seller.inventory -= 1;
        seller.payoff += seller_gain;
        seller.quote = self.config.no_ask();
        seller.value_history.push((seconds, seller.reservation_value));

        info!(
            "Trade executed: group={}, buyer={}, seller={}, price={}, at={}s",
            trade.group_id, trade.buyer, trade.seller, trade.price, trade.seconds
        );

        trade
    }
}

impl<R> Market<R> {
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn trader(&self, trader_id: TraderId) -> Result<&Trader> {
        self.traders
            .iter()
            .find(|t| t.id == trader_id)
            .ok_or(MarketError::UnknownTrader(trader_id))
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    /// (elapsed seconds, reservation value) series of a trader
    pub fn value_history(&self, trader_id: TraderId) -> Result<&[(i64, Price)]> {
        self.trader(trader_id).map(|t| t.value_history.as_slice())
    }

    fn position(&self, trader_id: TraderId) -> Result<usize> {
        self.traders
            .iter()
            .position(|t| t.id == trader_id)
            .ok_or(MarketError::UnknownTrader(trader_id))
    }

    /// Active bids, highest first
    pub fn bids(&self) -> Vec<Price> {
        let mut bids: Vec<Price> = self
            .traders
            .iter()
            .filter(|t| t.is_buyer() && t.quote > self.config.no_bid())
            .map(|t| t.quote)
            .collect();
        bids.sort_unstable_by(|a, b| b.cmp(a));
        bids
    }

    /// Active asks, lowest first
    pub fn asks(&self) -> Vec<Price> {
        let mut asks: Vec<Price> = self
            .traders
            .iter()
            .filter(|t| !t.is_buyer() && t.quote <= self.config.valuation_max)
            .map(|t| t.quote)
            .collect();
        asks.sort_unstable();
        asks
    }

    /// The market as seen by one trader
    pub fn snapshot(&self, trader_id: TraderId) -> Result<TraderView> {
        let trader = self.trader(trader_id)?;
        Ok(self.view_of(trader, self.bids(), self.asks(), self.ledger.price_history()))
    }

    /// The market as seen by every trader in the group
    pub fn snapshots(&self) -> BTreeMap<TraderId, TraderView> {
        let bids = self.bids();
        let asks = self.asks();
        let history = self.ledger.price_history();

        self.traders
            .iter()
            .map(|t| (t.id, self.view_of(t, bids.clone(), asks.clone(), history.clone())))
            .collect()
    }

    pub fn live_update(&self, news: Option<News>) -> LiveUpdate {
        LiveUpdate {
            views: self.snapshots(),
            news,
        }
    }

    fn view_of(
        &self,
        trader: &Trader,
        bids: Vec<Price>,
        asks: Vec<Price>,
        trade_history: Vec<(i64, Price)>,
    ) -> TraderView {
        TraderView {
            bids,
            asks,
            trade_history,
            inventory: trader.inventory,
            quote: trader.quote,
            payoff: trader.payoff,
            reservation_value: trader.reservation_value,
        }
    }

    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    fn elapsed_seconds_at(&self, now: Timestamp) -> i64 {
        (now - self.opened_at).num_seconds().max(0)
    }

    /// Whole seconds since the market opened
    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds_at(self.clock.now())
    }

    /// Time left in the trading window, never negative
    pub fn remaining(&self) -> Duration {
        let deadline = self.opened_at + Duration::seconds(self.config.trading_window_secs);
        (deadline - self.clock.now()).max(Duration::zero())
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining().num_seconds()
    }

    /// Whether the trading window has elapsed
    pub fn is_closed(&self) -> bool {
        self.remaining() <= Duration::zero()
    }
}
