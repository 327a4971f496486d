//! Fixed-cadence timer driven by the simulation clock

use serde::{Deserialize, Serialize};

/// Slack for float drift when the clock lands on a fire time
const FIRE_EPSILON: f32 = 1e-4;
/// Backlog beyond this many fires in one step is dropped
const MAX_FIRES_PER_ADVANCE: u32 = 64;

/// Fires every `interval` seconds, starting immediately
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimer {
    interval: f32,
    /// Time until the next fire
    remaining: f32,
}

impl IntervalTimer {
    pub fn every(interval: f32) -> Self {
        Self {
            interval,
            remaining: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance the clock by `dt`, returning how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !(self.interval > 0.0) || !dt.is_finite() {
            return 0;
        }
        self.remaining -= dt;
        if self.remaining > FIRE_EPSILON {
            return 0;
        }

        let due = ((FIRE_EPSILON - self.remaining) / self.interval).floor() as u32 + 1;
        if due > MAX_FIRES_PER_ADVANCE {
            log::warn!(
                "Timer fell {due} intervals behind, dropping all but {MAX_FIRES_PER_ADVANCE}"
            );
            self.remaining = self.interval;
            return MAX_FIRES_PER_ADVANCE;
        }
        self.remaining += due as f32 * self.interval;
        due
    }
}
