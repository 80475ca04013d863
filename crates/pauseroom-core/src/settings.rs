//! Work/break settings consumed by the phase timer.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed break duration, in minutes.
pub const BREAK_DURATION_RANGE: std::ops::RangeInclusive<u64> = 1..=60;
/// Allowed work frequency (time between breaks), in minutes.
pub const WORK_FREQUENCY_RANGE: std::ops::RangeInclusive<u64> = 5..=240;

/// How long breaks last and how often they come.
///
/// Validated by the caller before it reaches the timer. The timer itself
/// accepts any value without panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseSettings {
    #[serde(default = "default_break_duration")]
    pub break_duration_minutes: u64,
    #[serde(default = "default_work_frequency")]
    pub work_frequency_minutes: u64,
    /// Informational; the timer does not read it.
    #[serde(default)]
    pub active: bool,
}

fn default_break_duration() -> u64 {
    10
}
fn default_work_frequency() -> u64 {
    60
}

impl Default for PauseSettings {
    fn default() -> Self {
        Self {
            break_duration_minutes: default_break_duration(),
            work_frequency_minutes: default_work_frequency(),
            active: false,
        }
    }
}

impl PauseSettings {
    pub fn new(break_duration_minutes: u64, work_frequency_minutes: u64) -> Self {
        Self {
            break_duration_minutes,
            work_frequency_minutes,
            active: false,
        }
    }

    /// Range-check both fields. Empty when valid.
    pub fn validate(&self) -> Vec<String> {
        validate_settings(self.break_duration_minutes, self.work_frequency_minutes)
    }

    /// Like [`validate`](Self::validate), but as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Settings`] holding every message when
    /// either field is out of range.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ValidationError::Settings(errors))
        }
    }
}

/// Check a break duration and work frequency independently.
///
/// Both messages are returned when both values are out of range, duration first.
pub fn validate_settings(break_duration_minutes: u64, work_frequency_minutes: u64) -> Vec<String> {
    let mut errors = Vec::new();

    if !BREAK_DURATION_RANGE.contains(&break_duration_minutes) {
        errors.push(format!(
            "Break duration must be between {} and {} minutes",
            BREAK_DURATION_RANGE.start(),
            BREAK_DURATION_RANGE.end()
        ));
    }

    if !WORK_FREQUENCY_RANGE.contains(&work_frequency_minutes) {
        errors.push(format!(
            "Work frequency must be between {} and {} minutes",
            WORK_FREQUENCY_RANGE.start(),
            WORK_FREQUENCY_RANGE.end()
        ));
    }

    errors
}
