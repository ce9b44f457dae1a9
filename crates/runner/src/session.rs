//! Session - Groups, waiting room, trading window and results
//!
//! Each group owns one market behind its own async mutex, so quotes within
//! a group are settled one at a time while groups trade in parallel.

use std::collections::HashSet;
use std::sync::Arc;

use auction_core::{GroupId, Payoff, Price, Role, Trade, TraderId, TraderSeat};
use auction_clock::{Clock, SystemClock};
use dashmap::DashMap;
use double_auction::{LiveUpdate, Market, MarketError, TraderView};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};

/// Members of one group, in membership order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRoster {
    pub group_id: GroupId,
    pub seats: Vec<TraderSeat>,
}

/// Split participants into consecutive groups
///
/// The last group is smaller when the participants don't divide evenly.
/// Within a group, odd positions buy and even positions sell.
pub fn form_groups(num_participants: u32, players_per_group: u32) -> Vec<GroupRoster> {
    let size = players_per_group.max(1);
    (0..num_participants)
        .collect::<Vec<_>>()
        .chunks(size as usize)
        .zip(1..)
        .map(|(members, group_id)| GroupRoster {
            group_id,
            seats: (1..=members.len() as u32)
                .map(|id| TraderSeat::new(id, Role::for_position(id)))
                .collect(),
        })
        .collect()
}

/// Final state of a trader, shown on the results page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderResult {
    pub group_id: GroupId,
    pub trader: TraderId,
    pub role: Role,
    pub inventory: u32,
    pub payoff: Payoff,
    /// Trades the trader took part in
    pub trades: usize,
    pub value_history: Vec<(i64, Price)>,
}

enum GroupState {
    /// Waiting for every member to arrive
    Waiting {
        seats: Vec<TraderSeat>,
        arrived: HashSet<TraderId>,
    },
    Trading(Market),
}

/// A running experiment session
pub struct Session {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    groups: DashMap<GroupId, Arc<Mutex<GroupState>>>,
}

impl Session {
    /// Create a session on wall-clock time
    pub fn new(config: SessionConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a session with a custom time source
    pub fn with_clock(config: SessionConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let groups = DashMap::new();
        for roster in form_groups(config.num_participants, config.players_per_group) {
            groups.insert(
                roster.group_id,
                Arc::new(Mutex::new(GroupState::Waiting {
                    seats: roster.seats,
                    arrived: HashSet::new(),
                })),
            );
        }

        info!(
            "Session created: name={}, participants={}, groups={}, clock={}",
            config.name,
            config.num_participants,
            groups.len(),
            clock.name()
        );

        Ok(Self {
            config,
            clock,
            groups,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Group ids in ascending order
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.iter().map(|g| *g.key()).collect();
        ids.sort_unstable();
        ids
    }

    fn group(&self, group_id: GroupId) -> Result<Arc<Mutex<GroupState>>> {
        self.groups
            .get(&group_id)
            .map(|g| Arc::clone(g.value()))
            .ok_or(SessionError::UnknownGroup(group_id))
    }

    fn group_rng(&self, group_id: GroupId) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(group_id as u64)),
            None => StdRng::from_entropy(),
        }
    }

    fn open_market(&self, group_id: GroupId, seats: &[TraderSeat]) -> Result<Market> {
        Ok(Market::open(
            group_id,
            seats,
            self.config.market.clone(),
            Arc::clone(&self.clock),
            self.group_rng(group_id),
        )?)
    }

    /// Seats of a group
    pub async fn roster(&self, group_id: GroupId) -> Result<Vec<TraderSeat>> {
        let group = self.group(group_id)?;
        let state = group.lock().await;
        Ok(match &*state {
            GroupState::Waiting { seats, .. } => seats.clone(),
            GroupState::Trading(market) => market
                .traders()
                .iter()
                .map(|t| TraderSeat::new(t.id, t.role))
                .collect(),
        })
    }

    /// Register a member at the waiting room
    ///
    /// The market opens, and the trading window starts, once every member
    /// has arrived. Returns whether the group is trading.
    pub async fn arrive(&self, group_id: GroupId, trader_id: TraderId) -> Result<bool> {
        let group = self.group(group_id)?;
        let mut state = group.lock().await;

        let GroupState::Waiting { seats, arrived } = &mut *state else {
            return Ok(true);
        };

        if !seats.iter().any(|s| s.id == trader_id) {
            return Err(MarketError::UnknownTrader(trader_id).into());
        }
        arrived.insert(trader_id);
        if arrived.len() < seats.len() {
            return Ok(false);
        }

        let market = self.open_market(group_id, seats)?;
        *state = GroupState::Trading(market);
        Ok(true)
    }

    /// Open a group's market without waiting for its members
    pub async fn start_trading(&self, group_id: GroupId) -> Result<()> {
        let group = self.group(group_id)?;
        let mut state = group.lock().await;

        if let GroupState::Waiting { seats, .. } = &*state {
            let market = self.open_market(group_id, seats)?;
            *state = GroupState::Trading(market);
        }
        Ok(())
    }

    /// Open every group's market
    pub async fn start_all(&self) -> Result<()> {
        for group_id in self.group_ids() {
            self.start_trading(group_id).await?;
        }
        Ok(())
    }

    /// Handle a message from a trading page
    ///
    /// Malformed quotes are dropped: nothing is broadcast and `Ok(None)`
    /// is returned. Quotes after the trading window are refused.
    pub async fn live_method(
        &self,
        group_id: GroupId,
        trader_id: TraderId,
        data: &Value,
    ) -> Result<Option<LiveUpdate>> {
        let group = self.group(group_id)?;
        let mut state = group.lock().await;

        let GroupState::Trading(market) = &mut *state else {
            return Err(SessionError::TradingNotStarted(group_id));
        };

        if market.is_closed() {
            warn!(
                "Quote after trading window: group={}, trader={}",
                group_id, trader_id
            );
            return Err(SessionError::TradingClosed(group_id));
        }

        match market.handle_message(trader_id, data) {
            Ok(update) => Ok(Some(update)),
            Err(MarketError::InvalidQuote(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Current view of one trader
    ///
    /// A group still in the waiting room shows an empty book.
    pub async fn snapshot(&self, group_id: GroupId, trader_id: TraderId) -> Result<TraderView> {
        let group = self.group(group_id)?;
        let state = group.lock().await;
        match &*state {
            GroupState::Trading(market) => Ok(market.snapshot(trader_id)?),
            GroupState::Waiting { seats, .. } => seats
                .iter()
                .find(|s| s.id == trader_id)
                .map(|s| TraderView::before_open(s.role, &self.config.market))
                .ok_or_else(|| MarketError::UnknownTrader(trader_id).into()),
        }
    }

    /// Seconds left in a group's trading window, for page timeouts
    pub async fn remaining_seconds(&self, group_id: GroupId) -> Result<i64> {
        self.with_market(group_id, |market| Ok(market.remaining_seconds()))
            .await
    }

    /// Trades executed in a group so far
    pub async fn trades(&self, group_id: GroupId) -> Result<Vec<Trade>> {
        self.with_market(group_id, |market| Ok(market.ledger().trades().to_vec()))
            .await
    }

    /// Final state of every trader in a group
    pub async fn results(&self, group_id: GroupId) -> Result<Vec<TraderResult>> {
        self.with_market(group_id, |market| {
            Ok(market
                .traders()
                .iter()
                .map(|t| TraderResult {
                    group_id,
                    trader: t.id,
                    role: t.role,
                    inventory: t.inventory,
                    payoff: t.payoff,
                    trades: market.ledger().trades_of(t.id).count(),
                    value_history: t.value_history.clone(),
                })
                .collect())
        })
        .await
    }

    async fn with_market<T>(
        &self,
        group_id: GroupId,
        f: impl FnOnce(&Market) -> Result<T>,
    ) -> Result<T> {
        let group = self.group(group_id)?;
        let state = group.lock().await;
        match &*state {
            GroupState::Trading(market) => f(market),
            GroupState::Waiting { .. } => Err(SessionError::TradingNotStarted(group_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_groups_chunks_participants() {
        let groups = form_groups(7, 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].group_id, 1);
        assert_eq!(groups[2].group_id, 3);
        assert_eq!(groups[2].seats, vec![TraderSeat::buyer(1)]);

        let roles: Vec<Role> = groups[0].seats.iter().map(|s| s.role).collect();
        assert_eq!(roles, vec![Role::Buyer, Role::Seller, Role::Buyer]);
    }

    #[test]
    fn test_form_groups_even_split() {
        let groups = form_groups(6, 2);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.seats.len() == 2));
    }
}
