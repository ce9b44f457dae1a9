//! Session & Simulation Integration Test
//!
//! Tests sessions end to end:
//! - Waiting room and market opening
//! - Live messages, malformed input and trading window enforcement
//! - Robots trading in several groups concurrently

use std::sync::Arc;

use auction_clock::WorldClock;
use auction_core::{MarketConfig, Role};
use auction_runner::{Session, SessionConfig, SessionError, SimulationConfig, TradingSimulation};
use chrono::Duration;
use double_auction::MarketError;
use rust_decimal::Decimal;
use serde_json::json;

fn config(num_participants: u32) -> SessionConfig {
    SessionConfig {
        num_participants,
        seed: Some(11),
        ..Default::default()
    }
}

fn fixed_session(num_participants: u32) -> (Session, Arc<WorldClock>) {
    let clock = WorldClock::fixed(None);
    let session = Session::with_clock(config(num_participants), clock.clone()).unwrap();
    (session, clock)
}

/// Test that a group trades only once everybody has arrived
#[tokio::test]
async fn test_market_opens_when_group_is_complete() {
    let _ = env_logger::try_init();

    let (session, _) = fixed_session(3);
    assert_eq!(session.group_ids(), vec![1]);

    assert!(!session.arrive(1, 1).await.unwrap());
    assert!(!session.arrive(1, 2).await.unwrap());

    let result = session.live_method(1, 1, &json!({"offer": 60})).await;
    assert!(matches!(result, Err(SessionError::TradingNotStarted(1))));

    // The waiting room shows an empty book
    let view = session.snapshot(1, 2).await.unwrap();
    assert!(view.bids.is_empty() && view.asks.is_empty());
    assert!(view.trade_history.is_empty());
    assert_eq!(view.inventory, MarketConfig::default().items_per_seller);
    assert!(matches!(
        session.snapshot(1, 9).await,
        Err(SessionError::Market(MarketError::UnknownTrader(9)))
    ));

    // Arriving twice does not count twice
    assert!(!session.arrive(1, 2).await.unwrap());
    assert!(session.arrive(1, 3).await.unwrap());

    let update = session
        .live_method(1, 1, &json!({}))
        .await
        .unwrap()
        .expect("refresh returns views");
    assert_eq!(update.views.len(), 3);
    assert!(update.news.is_none());
}

/// Test that unknown groups and traders are reported
#[tokio::test]
async fn test_unknown_group_and_trader() {
    let (session, _) = fixed_session(3);

    assert!(matches!(
        session.arrive(5, 1).await,
        Err(SessionError::UnknownGroup(5))
    ));
    assert!(matches!(
        session.arrive(1, 9).await,
        Err(SessionError::Market(MarketError::UnknownTrader(9)))
    ));

    session.start_trading(1).await.unwrap();
    assert!(matches!(
        session.live_method(1, 9, &json!({"offer": 60})).await,
        Err(SessionError::Market(MarketError::UnknownTrader(9)))
    ));
}

/// Test a trade through the session layer
#[tokio::test]
async fn test_trade_through_session() {
    let (session, clock) = fixed_session(3);
    session.start_trading(1).await.unwrap();

    let roles: Vec<Role> = session
        .roster(1)
        .await
        .unwrap()
        .iter()
        .map(|s| s.role)
        .collect();
    assert_eq!(roles, vec![Role::Buyer, Role::Seller, Role::Buyer]);

    let update = session
        .live_method(1, 2, &json!({"offer": "50"}))
        .await
        .unwrap()
        .unwrap();
    assert!(update.news.is_none());
    assert_eq!(update.view(1).unwrap().asks, vec![50]);

    clock.advance(Duration::seconds(30));
    let update = session
        .live_method(1, 3, &json!({"offer": 60}))
        .await
        .unwrap()
        .unwrap();
    let news = update.news.expect("quotes cross");
    assert_eq!((news.buyer, news.seller, news.price), (3, 2, 60));

    let trades = session.trades(1).await.unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].seconds, 30);

    let results = session.results(1).await.unwrap();
    let seller = results.iter().find(|r| r.trader == 2).unwrap();
    assert_eq!(seller.inventory, 2);
    assert_eq!(seller.value_history.len(), 2);

    let trade_counts: Vec<usize> = results.iter().map(|r| r.trades).collect();
    assert_eq!(trade_counts, vec![0, 1, 1]);
}

/// Test that malformed quotes are dropped without a broadcast
#[tokio::test]
async fn test_malformed_quote_is_dropped() {
    let (session, _) = fixed_session(3);
    session.start_trading(1).await.unwrap();
    session
        .live_method(1, 2, &json!({"offer": 50}))
        .await
        .unwrap();

    let before = session.snapshot(1, 2).await.unwrap();
    let result = session
        .live_method(1, 1, &json!({"offer": "fifty"}))
        .await
        .unwrap();
    assert!(result.is_none());

    assert_eq!(session.snapshot(1, 2).await.unwrap(), before);
    assert!(session.trades(1).await.unwrap().is_empty());
}

/// Test that quotes are refused once the trading window has elapsed
#[tokio::test]
async fn test_trading_window_is_enforced() {
    let (session, clock) = fixed_session(3);
    session.start_trading(1).await.unwrap();

    assert_eq!(session.remaining_seconds(1).await.unwrap(), 300);
    clock.advance(Duration::seconds(120));
    assert_eq!(session.remaining_seconds(1).await.unwrap(), 180);

    clock.advance(Duration::seconds(181));
    assert_eq!(session.remaining_seconds(1).await.unwrap(), 0);
    assert!(matches!(
        session.live_method(1, 1, &json!({"offer": 60})).await,
        Err(SessionError::TradingClosed(1))
    ));

    // Results stay readable after the close
    assert_eq!(session.results(1).await.unwrap().len(), 3);
}

/// Test that the same seed yields the same valuations
#[tokio::test]
async fn test_seeded_sessions_are_reproducible() {
    let (first, _) = fixed_session(6);
    let (second, _) = fixed_session(6);
    first.start_all().await.unwrap();
    second.start_all().await.unwrap();

    for group_id in first.group_ids() {
        for trader in 1..=3 {
            assert_eq!(
                first.snapshot(group_id, trader).await.unwrap(),
                second.snapshot(group_id, trader).await.unwrap()
            );
        }
    }
}

/// Test that concurrent quotes within one group are settled one at a time
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_quotes_keep_inventory_consistent() {
    let session = Arc::new(
        Session::with_clock(
            SessionConfig {
                num_participants: 6,
                players_per_group: 6,
                seed: Some(5),
                ..Default::default()
            },
            WorldClock::fixed(None),
        )
        .unwrap(),
    );
    session.start_all().await.unwrap();

    let mut handles = Vec::new();
    for trader in 1..=6u32 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move {
            for i in 0..200i64 {
                let price = if trader % 2 == 1 { 60 + i % 50 } else { 10 + i % 90 };
                session
                    .live_method(1, trader, &json!({ "offer": price }))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let results = session.results(1).await.unwrap();
    let trades = session.trades(1).await.unwrap();
    let held: u32 = results
        .iter()
        .filter(|r| r.role == Role::Buyer)
        .map(|r| r.inventory)
        .sum();
    let unsold: u32 = results
        .iter()
        .filter(|r| r.role == Role::Seller)
        .map(|r| r.inventory)
        .sum();

    assert_eq!(held as usize, trades.len());
    assert_eq!(held + unsold, 3 * MarketConfig::default().items_per_seller);
    assert!(results.iter().all(|r| r.role != Role::Buyer || r.trades == r.inventory as usize));
    assert!(!trades.is_empty());
}

/// Test that simulation runs robots in every group
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simulation_runs() {
    let _ = env_logger::try_init();

    let config = SimulationConfig {
        session: SessionConfig {
            num_participants: 12,
            seed: Some(42),
            ..Default::default()
        },
        rounds: 100,
        ..Default::default()
    };

    let sim = TradingSimulation::with_clock(config, WorldClock::fixed(None)).unwrap();
    let results = sim.run().await.unwrap();

    assert_eq!(results.trades_by_group.len(), 4);
    assert_eq!(results.traders.len(), 12);
    assert!(results.total_quotes > 0);
    assert_eq!(
        results.total_trades,
        results.trades_by_group.values().sum::<usize>()
    );

    // One seller per group of three
    let stock = MarketConfig::default().items_per_seller as usize;
    assert!(results.trades_by_group.values().all(|&n| n <= stock));

    let payoff_sum = results
        .traders
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc + t.payoff);
    assert_eq!(results.total_surplus, payoff_sum);

    // Robot sellers never ask below cost and trades clear at the bid
    assert!(
        results
            .traders
            .iter()
            .filter(|t| t.role == Role::Seller)
            .all(|t| t.payoff >= Decimal::ZERO)
    );
}
