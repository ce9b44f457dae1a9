//! Auction Runner - Double Auction Experiment Sessions
//!
//! Runs the market for a whole experiment session:
//!
//! - **Config**: Session parameters loaded from JSON
//! - **Session**: Group formation, role assignment, waiting for players,
//!   trading window enforcement and results
//! - **Robots**: Zero-intelligence traders that quote within their budget
//! - **Simulation**: Robots trading in every group concurrently
//!
//! ## Architecture
//!
//! ```text
//!   participants / robots
//!            │ {"offer": 60}
//!            ▼
//! ┌──────────────────────────────────────────────┐
//! │                   Session                    │
//! │                                              │
//! │   group 1 ─► Mutex<Market>   (serialized)    │
//! │   group 2 ─► Mutex<Market>   (serialized)    │
//! │   ...          groups run in parallel        │
//! └──────────────────────┬───────────────────────┘
//!                        │ LiveUpdate
//!                        ▼
//!              views + news per trader
//! ```

pub mod config;
pub mod error;
pub mod robot;
pub mod session;
pub mod simulation;

// Re-export main types
pub use config::{SessionConfig, load_config, load_config_from_str, load_default_config};
pub use error::{Result, SessionError};
pub use robot::RobotTrader;
pub use session::{GroupRoster, Session, TraderResult, form_groups};
pub use simulation::{SimulationConfig, SimulationResults, TradingSimulation};
