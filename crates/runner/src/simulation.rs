//! Simulation - Robot traders in every group of a session
//!
//! Every seat is taken by a robot running in its own task. Robots of the
//! same group contend for the group's market, robots of different groups
//! trade in parallel.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use auction_clock::{Clock, SystemClock};
use auction_core::{GroupId, Payoff};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::robot::RobotTrader;
use crate::session::{Session, TraderResult};

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub session: SessionConfig,
    /// Quote attempts per robot
    pub rounds: usize,
    /// Pause between two quotes of the same robot
    pub quote_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                num_participants: 9,
                ..Default::default()
            },
            rounds: 200,
            quote_interval: Duration::ZERO,
        }
    }
}

/// Simulation results
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationResults {
    /// Total trades executed
    pub total_trades: usize,
    /// Total quotes submitted
    pub total_quotes: u64,
    /// Trades by group
    pub trades_by_group: BTreeMap<GroupId, usize>,
    /// Final state of every trader
    pub traders: Vec<TraderResult>,
    /// Sum of all payoffs
    pub total_surplus: Payoff,
}

/// Robot-driven trading session
pub struct TradingSimulation {
    config: SimulationConfig,
    session: Arc<Session>,
}

impl TradingSimulation {
    /// Create a simulation on wall-clock time
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a simulation with a custom time source
    pub fn with_clock(config: SimulationConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let session = Arc::new(Session::with_clock(config.session.clone(), clock)?);
        Ok(Self { config, session })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Open every market, let the robots trade, and collect the results
    pub async fn run(&self) -> Result<SimulationResults> {
        self.session.start_all().await?;

        let mut handles = Vec::new();
        for group_id in self.session.group_ids() {
            for seat in self.session.roster(group_id).await? {
                let robot = match self.config.session.seed {
                    Some(seed) => RobotTrader::with_seed(
                        group_id,
                        seat.id,
                        seat.role,
                        seed ^ (((group_id as u64) << 32) | seat.id as u64),
                    ),
                    None => RobotTrader::new(group_id, seat.id, seat.role),
                };
                handles.push(tokio::spawn(Self::run_robot(
                    Arc::clone(&self.session),
                    robot,
                    self.config.rounds,
                    self.config.quote_interval,
                )));
            }
        }

        info!("Simulation started with {} robots", handles.len());

        let mut results = SimulationResults::default();
        for handle in handles {
            let quotes = handle
                .await
                .map_err(|e| SessionError::Task(e.to_string()))??;
            results.total_quotes += quotes;
        }

        for group_id in self.session.group_ids() {
            let trades = self.session.trades(group_id).await?.len();
            results.trades_by_group.insert(group_id, trades);
            results.total_trades += trades;
            results
                .traders
                .extend(self.session.results(group_id).await?);
        }
        results.total_surplus = results
            .traders
            .iter()
            .map(|t| t.payoff)
            .fold(Decimal::ZERO, |acc, p| acc + p);

        info!(
            "Simulation finished: trades={}, quotes={}, surplus={}",
            results.total_trades, results.total_quotes, results.total_surplus
        );

        Ok(results)
    }

    /// Quote loop of one robot. Stops early when the trading window closes
    async fn run_robot(
        session: Arc<Session>,
        mut robot: RobotTrader,
        rounds: usize,
        quote_interval: Duration,
    ) -> Result<u64> {
        let market_config = session.config().market.clone();

        for _ in 0..rounds {
            let view = session.snapshot(robot.group_id, robot.trader_id).await?;

            if let Some(price) = robot.next_quote(&view, &market_config) {
                let message = json!({ "offer": price });
                match session
                    .live_method(robot.group_id, robot.trader_id, &message)
                    .await
                {
                    Ok(Some(update)) => {
                        if let Some(news) = update.news {
                            debug!(
                                "Robot trade: group={}, buyer={}, seller={}, price={}",
                                robot.group_id, news.buyer, news.seller, news.price
                            );
                        }
                    }
                    Ok(None) => {}
                    Err(SessionError::TradingClosed(_)) => break,
                    Err(e) => return Err(e),
                }
            }

            if quote_interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(quote_interval).await;
            }
        }

        Ok(robot.quotes_sent)
    }
}
