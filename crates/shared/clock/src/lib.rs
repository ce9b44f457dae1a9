//! Auction Clock Infrastructure
//!
//! Provides time sources for markets:
//!
//! - `SystemClock`: wall-clock time for live sessions
//! - `WorldClock`: controllable time for simulations and tests
//!
//! ## Usage
//!
//! ```ignore
//! use auction_clock::{WorldClock, TimeScale};
//! use chrono::Duration;
//!
//! let world = WorldClock::new(None);
//!
//! world.set_time_scale(TimeScale::Fast(10)); // 10x speed
//! world.set_time_scale(TimeScale::Fixed);    // Frozen time
//! world.advance(Duration::minutes(5));       // Jump forward
//! ```

mod system;
mod world;

pub use system::SystemClock;
pub use world::{TimeScale, WorldClock};

// Re-export the Clock trait for convenience
pub use auction_ports::Clock;
