use serde::{Deserialize, Serialize};

use crate::settings::PauseSettings;
use crate::time_utils::{format_long, format_short, minutes_to_seconds, progress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Phase::Work => "💼",
            Phase::Break => "☕",
        }
    }

    /// Accent colour used by displays, as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Phase::Work => "#4f46e5",
            Phase::Break => "#4ecdc4",
        }
    }

    /// Full length of this phase under `settings`, in seconds.
    pub fn duration_secs(self, settings: &PauseSettings) -> u64 {
        match self {
            Phase::Work => minutes_to_seconds(settings.work_frequency_minutes),
            Phase::Break => minutes_to_seconds(settings.break_duration_minutes),
        }
    }
}

/// Mutable countdown state, owned by a single [`PhaseTimer`](super::PhaseTimer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub is_running: bool,
    pub time_remaining_seconds: u64,
    pub current_phase: Phase,
    /// Length of the current or most recent work phase.
    pub total_work_seconds: u64,
    /// Length of the current or most recent break phase.
    pub total_break_seconds: u64,
}

impl TimerState {
    /// Stopped, at the start of a full work phase.
    pub fn initial(settings: &PauseSettings) -> Self {
        let work = Phase::Work.duration_secs(settings);
        Self {
            is_running: false,
            time_remaining_seconds: work,
            current_phase: Phase::Work,
            total_work_seconds: work,
            total_break_seconds: Phase::Break.duration_secs(settings),
        }
    }

    /// Total length of the current phase.
    pub fn total_seconds(&self) -> u64 {
        match self.current_phase {
            Phase::Work => self.total_work_seconds,
            Phase::Break => self.total_break_seconds,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        progress(self.time_remaining_seconds, self.total_seconds())
    }
}

/// Read-only projection handed to displays.
///
/// Derived from a [`TimerState`] on every read, never stored alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub state: TimerState,
    pub progress: f64,
    /// `MM:SS`
    pub formatted_time: String,
    /// `1h 2m 5s`
    pub formatted_long: String,
    pub phase_label: String,
    /// Hex accent colour for the current phase.
    pub phase_color: String,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        let remaining = i64::try_from(state.time_remaining_seconds).unwrap_or(i64::MAX);
        Self {
            progress: state.progress(),
            formatted_time: format_short(remaining),
            formatted_long: format_long(remaining),
            phase_label: format!(
                "{} {}",
                state.current_phase.emoji(),
                state.current_phase.label()
            ),
            phase_color: state.current_phase.color().to_string(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_alternates() {
        assert_eq!(Phase::Work.other(), Phase::Break);
        assert_eq!(Phase::Break.other(), Phase::Work);
    }

    #[test]
    fn initial_state_from_settings() {
        let state = TimerState::initial(&PauseSettings::new(10, 60));
        assert!(!state.is_running);
        assert_eq!(state.current_phase, Phase::Work);
        assert_eq!(state.time_remaining_seconds, 3600);
        assert_eq!(state.total_work_seconds, 3600);
        assert_eq!(state.total_break_seconds, 600);
        assert_eq!(state.total_seconds(), 3600);
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn view_is_derived_from_state() {
        let mut state = TimerState::initial(&PauseSettings::new(10, 60));
        state.time_remaining_seconds = 1800;
        let view = TimerView::from(state);
        assert_eq!(view.progress, 0.5);
        assert_eq!(view.formatted_time, "30:00");
        assert_eq!(view.formatted_long, "30m 0s");
        assert_eq!(view.phase_label, "💼 Work");
        assert_eq!(view.phase_color, "#4f46e5");

        state.current_phase = Phase::Break;
        assert_eq!(TimerView::from(state).phase_color, "#4ecdc4");
    }

    #[test]
    fn zero_totals_do_not_divide_by_zero() {
        let state = TimerState::initial(&PauseSettings::new(0, 0));
        assert_eq!(state.total_seconds(), 0);
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Break).unwrap(), "\"break\"");
    }
}
