use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::NotificationKind;
use crate::settings::PauseSettings;
use crate::timer::{Phase, TimerState};

/// Every state change of the phase timer produces an Event.
/// Displays poll for them or subscribe through the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        /// Notification scheduled to fire when the phase ends.
        notification: NotificationKind,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero and rolled into the next phase.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// User jumped to the next phase.
    PhaseSkipped {
        from: Phase,
        to: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: PauseSettings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        progress: f64,
        formatted_time: String,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::PhaseCompleted {
            from: Phase::Work,
            to: Phase::Break,
            duration_secs: 600,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhaseCompleted");
        assert_eq!(json["from"], "work");
        assert_eq!(json["to"], "break");
        assert_eq!(json["duration_secs"], 600);
    }
}
