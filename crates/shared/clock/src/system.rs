use auction_core::Timestamp;
use auction_ports::Clock;
use chrono::Utc;

/// Wall clock for live sessions
///
/// Trading windows measured with it expire in real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
