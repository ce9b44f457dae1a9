use auction_core::Timestamp;
use auction_ports::Clock;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Time scale modes for simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeScale {
    /// Real-time (1:1 ratio with wall clock)
    #[default]
    Normal,
    /// Accelerated time (multiplier applied to elapsed time)
    Fast(u32),
    /// Decelerated time (divisor applied to elapsed time)
    Slow(u32),
    /// Fixed time (only advances when explicitly moved)
    Fixed,
}

#[derive(Debug)]
struct ClockState {
    /// Wall time at the last re-anchoring
    anchor_real: Timestamp,
    /// Simulated time at the last re-anchoring
    anchor_sim: Timestamp,
    scale: TimeScale,
}

impl ClockState {
    fn sim_time(&self, real_now: Timestamp) -> Timestamp {
        let real_elapsed = real_now - self.anchor_real;
        // Factors above i32::MAX saturate
        let sim_elapsed = match self.scale {
            TimeScale::Normal => real_elapsed,
            TimeScale::Fast(multiplier) => real_elapsed
                .checked_mul(i32::try_from(multiplier).unwrap_or(i32::MAX))
                .unwrap_or(Duration::MAX),
            TimeScale::Slow(0) | TimeScale::Fixed => Duration::zero(),
            TimeScale::Slow(divisor) => real_elapsed / i32::try_from(divisor).unwrap_or(i32::MAX),
        };
        self.anchor_sim
            .checked_add_signed(sim_elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Controllable simulation clock
///
/// Simulated time is derived from wall time and the current time scale.
/// Changing the scale re-anchors the clock so time stays continuous.
/// In Fixed mode time only moves through `advance` and `set_time`,
/// which makes trade timestamps fully deterministic in tests.
#[derive(Debug)]
pub struct WorldClock {
    state: RwLock<ClockState>,
}

impl WorldClock {
    /// Create a new world clock
    ///
    /// # Arguments
    /// * `initial_time` - Optional starting time. If None, uses current wall time.
    pub fn new(initial_time: Option<Timestamp>) -> Arc<Self> {
        let now = Utc::now();
        Arc::new(Self {
            state: RwLock::new(ClockState {
                anchor_real: now,
                anchor_sim: initial_time.unwrap_or(now),
                scale: TimeScale::Normal,
            }),
        })
    }

    /// Create a frozen clock at `initial_time` (or now)
    pub fn fixed(initial_time: Option<Timestamp>) -> Arc<Self> {
        let clock = Self::new(initial_time);
        clock.set_time_scale(TimeScale::Fixed);
        clock
    }

    /// Set the time scale
    pub fn set_time_scale(&self, scale: TimeScale) {
        let real_now = Utc::now();
        let mut state = self.state.write();
        state.anchor_sim = state.sim_time(real_now);
        state.anchor_real = real_now;
        state.scale = scale;
    }

    /// Get the current time scale
    pub fn time_scale(&self) -> TimeScale {
        self.state.read().scale
    }

    /// Advance the simulated time by a specified duration
    pub fn advance(&self, duration: Duration) {
        self.state.write().anchor_sim += duration;
    }

    /// Explicitly set the simulation time
    ///
    /// Warning: This can cause time discontinuities. Use with caution.
    pub fn set_time(&self, time: Timestamp) {
        let real_now = Utc::now();
        let mut state = self.state.write();
        state.anchor_sim = time;
        state.anchor_real = real_now;
    }
}

impl Clock for WorldClock {
    fn now(&self) -> Timestamp {
        self.state.read().sim_time(Utc::now())
    }

    fn name(&self) -> &str {
        "WorldClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_world_clock_creation() {
        let clock = WorldClock::new(None);
        let time1 = clock.now();
        let time2 = clock.now();
        assert!(time2 >= time1);
    }

    #[test]
    fn test_fixed_mode() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let clock = WorldClock::fixed(Some(start));

        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let time2 = clock.now();

        // In fixed mode, time should not advance automatically
        assert_eq!(time1, start);
        assert_eq!(time1, time2);

        // Advance manually
        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now() - time1, Duration::seconds(5));
    }

    #[test]
    fn test_fast_mode_runs_ahead_of_wall_time() {
        let clock = WorldClock::new(None);
        clock.set_time_scale(TimeScale::Fast(100));

        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let time2 = clock.now();

        assert!(time2 - time1 >= Duration::milliseconds(1000));
    }

    #[test]
    fn test_huge_scale_factors_keep_time_moving_forward() {
        let clock = WorldClock::new(None);
        let start = clock.now();

        clock.set_time_scale(TimeScale::Fast(u32::MAX));
        std::thread::sleep(std::time::Duration::from_millis(5));
        let fast = clock.now();
        assert!(fast - start >= Duration::seconds(1000));

        clock.set_time_scale(TimeScale::Slow(u32::MAX));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now() >= fast);
    }

    #[test]
    fn test_set_time_jumps() {
        let clock = WorldClock::fixed(None);
        let target = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap();
        clock.set_time(target);
        assert_eq!(clock.now(), target);
    }
}
