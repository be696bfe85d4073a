//! Countdown timer for pacing challenges
//!
//! A one-shot countdown from the configured duration to zero, driven by
//! scheduled alarm callbacks at one-second cadence. The countdown itself is
//! a plain value; scheduling and cancellation are owned by the session
//! controller, which guards against stale callbacks with an epoch carried
//! in every alarm.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// A running one-shot countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Whole seconds left until the countdown ends
    remaining: u64,
}

impl Countdown {
    /// Creates a countdown over the given duration
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration.as_secs(),
        }
    }

    /// Whole seconds left until the countdown ends
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Advances the countdown by one second
    ///
    /// # Returns
    ///
    /// The outcome of this tick: still running, inside the warning window,
    /// or finished.
    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        match self.remaining {
            0 => Tick::Finished,
            remaining if remaining <= crate::constants::timer::WARNING_SECONDS => {
                Tick::Warning(remaining)
            }
            remaining => Tick::Running(remaining),
        }
    }
}

/// The outcome of advancing a countdown by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds remain and the warning window has not been reached
    Running(u64),
    /// Seconds remain and every tick should play a warning cue
    Warning(u64),
    /// The countdown reached zero and deactivates
    Finished,
}

/// Update messages about the countdown timer
#[serde_with::serde_as]
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// The countdown started
    Started {
        /// Total duration it will run for
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        duration: Duration,
    },
    /// The countdown advanced by one second
    Tick {
        /// Whole seconds left
        remaining: u64,
    },
    /// The countdown reached zero and deactivated
    Ended,
}

/// Alarm messages scheduled for countdown ticks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Advance the countdown by one second
    Tick {
        /// Timer epoch the alarm was scheduled under; alarms from an
        /// earlier epoch are stale and must be ignored
        epoch: u64,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_tick_sequence() {
        let mut countdown = Countdown::new(Duration::from_secs(8));
        assert_eq!(countdown.remaining(), 8);

        assert_eq!(countdown.tick(), Tick::Running(7));
        assert_eq!(countdown.tick(), Tick::Running(6));
        assert_eq!(countdown.tick(), Tick::Warning(5));
        assert_eq!(countdown.tick(), Tick::Warning(4));
        assert_eq!(countdown.tick(), Tick::Warning(3));
        assert_eq!(countdown.tick(), Tick::Warning(2));
        assert_eq!(countdown.tick(), Tick::Warning(1));
        assert_eq!(countdown.tick(), Tick::Finished);
    }

    #[test]
    fn test_countdown_saturates_at_zero() {
        let mut countdown = Countdown::new(Duration::from_secs(1));
        assert_eq!(countdown.tick(), Tick::Finished);
        assert_eq!(countdown.tick(), Tick::Finished);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_started_message_serializes_seconds() {
        let message = UpdateMessage::Started {
            duration: Duration::from_secs(30),
        };
        let serialized = serde_json::to_string(&message).unwrap();

        assert!(serialized.contains("\"duration\":30"));
    }

    #[test]
    fn test_alarm_round_trip() {
        let alarm = AlarmMessage::Tick { epoch: 4 };
        let serialized = serde_json::to_string(&alarm).unwrap();
        let deserialized: AlarmMessage = serde_json::from_str(&serialized).unwrap();

        let AlarmMessage::Tick { epoch } = deserialized;
        assert_eq!(epoch, 4);
    }
}
