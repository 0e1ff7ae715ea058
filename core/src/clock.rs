//! Game clock and replay pacing.

use crate::types::Seconds;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Period and seconds remaining. Period 0 is pregame.
///
/// RULE: the clock only moves forward. A new period must have a higher
/// index than the current one, and seconds only run off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameClock {
    pub period: u32,
    pub seconds_remaining: Seconds,
}

impl GameClock {
    pub fn pregame() -> Self {
        Self {
            period: 0,
            seconds_remaining: 0,
        }
    }

    /// Start the next period with a full clock.
    /// Panics if `period` does not move forward; callers own the sequence.
    pub fn start_period(&mut self, period: u32, length: Seconds) {
        assert!(
            period > self.period,
            "start_period({period}) would regress from period {}",
            self.period
        );
        self.period = period;
        self.seconds_remaining = length;
    }

    /// Run `elapsed` seconds off the clock. Returns the seconds actually used.
    pub fn run_off(&mut self, elapsed: Seconds) -> Seconds {
        let used = elapsed.min(self.seconds_remaining);
        self.seconds_remaining -= used;
        used
    }

    pub fn expired(&self) -> bool {
        self.seconds_remaining == 0
    }

    /// (period, -seconds) ordering key; never decreases over a game.
    pub fn progress_key(&self) -> (u32, i64) {
        (self.period, -i64::from(self.seconds_remaining))
    }
}

/// Live replay pace presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplaySpeed {
    Normal,      // one chunk per ~1.2 s
    Accelerated, // one chunk per ~0.3 s
    FastForward, // one chunk per 50 ms
}

impl ReplaySpeed {
    pub fn interval(&self) -> Duration {
        match self {
            Self::Normal => Duration::from_millis(1200),
            Self::Accelerated => Duration::from_millis(300),
            Self::FastForward => Duration::from_millis(50),
        }
    }
}

impl std::str::FromStr for ReplaySpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "accelerated" => Ok(Self::Accelerated),
            "fast_forward" | "fast" => Ok(Self::FastForward),
            other => Err(format!("unknown replay speed '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_off_saturates() {
        let mut clock = GameClock::pregame();
        clock.start_period(1, 30);
        assert_eq!(clock.run_off(20), 20);
        assert_eq!(clock.run_off(20), 10);
        assert!(clock.expired());
    }

    #[test]
    #[should_panic(expected = "would regress")]
    fn periods_never_regress() {
        let mut clock = GameClock::pregame();
        clock.start_period(2, 60);
        clock.start_period(1, 60);
    }

    #[test]
    fn progress_key_orders_time() {
        let mut clock = GameClock::pregame();
        clock.start_period(1, 60);
        let a = clock.progress_key();
        clock.run_off(10);
        let b = clock.progress_key();
        clock.start_period(2, 60);
        let c = clock.progress_key();
        assert!(a < b && b < c);
    }
}
