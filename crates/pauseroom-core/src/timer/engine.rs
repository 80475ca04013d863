//! Phase timer state machine.
//!
//! Alternates between Work and Break phases. The engine has no clock of its
//! own: something else calls `tick()` once per second while it runs, either a
//! test loop or the [`TimerRunner`](super::TimerRunner).
//!
//! ## State Transitions
//!
//! ```text
//! (Work, Stopped) --start--> (Work, Running) --tick at zero--> (Break, Running)
//!        ^                         |                                 |
//!        +---------stop/reset------+<------------tick at zero--------+
//! ```
//!
//! `skip()` swaps the phase and leaves the running flag alone.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(PauseSettings::default(), NoopGateway);
//! timer.start();
//! // Once per second:
//! timer.tick(); // Returns Some(Event::PhaseCompleted) at a phase boundary
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use super::phase::{Phase, TimerState, TimerView};
use crate::error::GatewayError;
use crate::events::Event;
use crate::gateway::{FeedbackKind, Gateway, ImpactStyle, NotificationKind};
use crate::settings::PauseSettings;

/// Work/break countdown.
///
/// Notification failures reported by the gateway are logged and dropped;
/// the countdown never depends on them.
#[derive(Debug)]
pub struct PhaseTimer<G> {
    settings: PauseSettings,
    state: TimerState,
    gateway: G,
}

impl<G: Gateway> PhaseTimer<G> {
    /// Stopped, at the start of a full work phase.
    pub fn new(settings: PauseSettings, gateway: G) -> Self {
        Self {
            state: TimerState::initial(&settings),
            settings,
            gateway,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer_state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &PauseSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        self.view().formatted_time
    }

    pub fn view(&self) -> TimerView {
        TimerView::from(self.state)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let view = self.view();
        Event::StateSnapshot {
            state: view.state,
            progress: view.progress,
            formatted_time: view.formatted_time,
            at: Utc::now(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down. Returns `None` if already running.
    ///
    /// Schedules the notification for the end of the current phase.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        self.gateway.haptic_impact(ImpactStyle::Medium);

        let remaining = self.state.time_remaining_seconds;
        let notification = match self.state.current_phase {
            Phase::Work => {
                let result = self.gateway.schedule_break_notification(remaining);
                log_gateway_failure("schedule break notification", result);
                NotificationKind::Break
            }
            Phase::Break => {
                let result = self.gateway.schedule_work_notification(remaining);
                log_gateway_failure("schedule work notification", result);
                NotificationKind::Work
            }
        };

        info!(phase = ?self.state.current_phase, remaining, "timer started");
        Some(Event::TimerStarted {
            phase: self.state.current_phase,
            remaining_secs: remaining,
            notification,
            at: Utc::now(),
        })
    }

    /// Stop counting down. Returns `None` if already stopped.
    ///
    /// Cancels every pending notification.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        self.gateway.haptic_impact(ImpactStyle::Light);
        let result = self.gateway.cancel_all_scheduled();
        log_gateway_failure("cancel scheduled notifications", result);

        info!(phase = ?self.state.current_phase, remaining = self.state.time_remaining_seconds, "timer stopped");
        Some(Event::TimerStopped {
            phase: self.state.current_phase,
            remaining_secs: self.state.time_remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Stop, then return to the start of a full work phase.
    ///
    /// Only `TimerReset` is returned. Callers that broadcast a stop should
    /// call [`stop`](Self::stop) first.
    pub fn reset(&mut self) -> Option<Event> {
        self.stop();
        self.state = TimerState::initial(&self.settings);
        info!("timer reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Jump to the other phase at its full length.
    ///
    /// Keeps the running flag as is and leaves notifications untouched.
    pub fn skip(&mut self) -> Option<Event> {
        self.gateway.haptic_impact(ImpactStyle::Medium);
        let from = self.state.current_phase;
        let duration_secs = self.enter(from.other());
        info!(?from, to = ?self.state.current_phase, "phase skipped");
        Some(Event::PhaseSkipped {
            from,
            to: self.state.current_phase,
            duration_secs,
            at: Utc::now(),
        })
    }

    /// Replace the settings and hard-reset to their initial state.
    ///
    /// A running countdown is stopped and its notification cancelled,
    /// whatever phase it was in.
    pub fn set_settings(&mut self, settings: PauseSettings) -> Option<Event> {
        if self.state.is_running {
            let result = self.gateway.cancel_all_scheduled();
            log_gateway_failure("cancel scheduled notifications", result);
        }
        self.settings = settings;
        self.state = TimerState::initial(&self.settings);
        info!(
            break_minutes = settings.break_duration_minutes,
            work_minutes = settings.work_frequency_minutes,
            "settings changed, timer reset"
        );
        Some(Event::SettingsChanged {
            settings,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `Some(Event::PhaseCompleted)` when the
    /// countdown reaches zero and rolls into the next phase.
    ///
    /// Does nothing while stopped. The next phase keeps running; its
    /// notification is not scheduled until the next explicit `start()`.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }

        let remaining = self.state.time_remaining_seconds.saturating_sub(1);
        if remaining > 0 {
            self.state.time_remaining_seconds = remaining;
            return None;
        }

        self.gateway.haptic_feedback(FeedbackKind::Success);
        let from = self.state.current_phase;
        let duration_secs = self.enter(from.other());
        debug!(?from, to = ?self.state.current_phase, duration_secs, "phase completed");
        Some(Event::PhaseCompleted {
            from,
            to: self.state.current_phase,
            duration_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Switch to `phase` at its full length, refreshing that phase's total.
    fn enter(&mut self, phase: Phase) -> u64 {
        let secs = phase.duration_secs(&self.settings);
        match phase {
            Phase::Work => self.state.total_work_seconds = secs,
            Phase::Break => self.state.total_break_seconds = secs,
        }
        self.state.current_phase = phase;
        self.state.time_remaining_seconds = secs;
        secs
    }
}

fn log_gateway_failure(action: &str, result: Result<(), GatewayError>) {
    if let Err(e) = result {
        warn!(error = %e, "failed to {action}; countdown continues");
    }
}
