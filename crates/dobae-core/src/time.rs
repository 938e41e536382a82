//! Tick-based time
//!
//! The runtime advances in discrete 100 ms ticks. Work-session countdowns
//! and the debounced remote save are both expressed as tick delays, so the
//! whole timing model stays deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discrete tick identifier (logical time unit)
pub type Tick = u64;

/// Wall-clock milliseconds represented by one tick.
pub const TICK_MS: u64 = 100;

/// Ticks per second of game time.
pub const TICKS_PER_SECOND: u64 = 1000 / TICK_MS;

/// Simulation clock state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Current tick number
    pub tick: Tick,
    /// Wall-clock instant of tick zero
    pub started_at: DateTime<Utc>,
}

impl Clock {
    /// Create a clock anchored at the current wall-clock time.
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Create a clock anchored at a specific instant (tests use a fixed one).
    pub fn anchored_at(started_at: DateTime<Utc>) -> Self {
        Self { tick: 0, started_at }
    }

    /// Advance to the next tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Wall-clock milliseconds for the current tick. Used to stamp
    /// `obtained_at` on pulled characters.
    pub fn now_ms(&self) -> i64 {
        self.started_at.timestamp_millis() + (self.tick * TICK_MS) as i64
    }

    /// Convert a whole-second duration into ticks.
    pub fn ticks_for_seconds(seconds: i64) -> Tick {
        seconds.max(0) as u64 * TICKS_PER_SECOND
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
