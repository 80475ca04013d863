//! Async owner of a [`PhaseTimer`].
//!
//! One task owns the timer and its tick source. Commands arrive over a
//! channel and ticks come from a `tokio::time::Interval`, so every mutation
//! happens on that task, one at a time. The interval only exists while the
//! timer runs: stopping drops it.
//!
//! Observers read a [`TimerView`] from a watch channel or subscribe to the
//! [`Event`] broadcast.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{debug, info};

use super::engine::PhaseTimer;
use super::phase::TimerView;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::gateway::Gateway;
use crate::settings::PauseSettings;

/// Real-time tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

enum Command {
    /// Optional tick budget: stop by itself after that many ticks.
    Start(Option<u64>, oneshot::Sender<Option<Event>>),
    Stop(oneshot::Sender<Option<Event>>),
    Reset(oneshot::Sender<Option<Event>>),
    Skip(oneshot::Sender<Option<Event>>),
    SetSettings(PauseSettings, oneshot::Sender<Option<Event>>),
    Snapshot(oneshot::Sender<Event>),
    Shutdown,
}

enum Step {
    Command(Option<Command>),
    Tick,
}

/// Cloneable handle to a running timer task.
///
/// When the last handle is dropped the task exits and releases its tick source.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<TimerView>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    pub async fn start(&self) -> Result<Option<Event>> {
        self.request(|reply| Command::Start(None, reply)).await
    }

    /// Start, then stop on the task itself once exactly `ticks` ticks have
    /// landed. The stop is broadcast as `TimerStopped`.
    ///
    /// Returns `None` without setting a budget if already running.
    pub async fn start_for(&self, ticks: u64) -> Result<Option<Event>> {
        self.request(|reply| Command::Start(Some(ticks), reply)).await
    }

    pub async fn stop(&self) -> Result<Option<Event>> {
        self.request(Command::Stop).await
    }

    pub async fn reset(&self) -> Result<Option<Event>> {
        self.request(Command::Reset).await
    }

    pub async fn skip(&self) -> Result<Option<Event>> {
        self.request(Command::Skip).await
    }

    /// Replace settings. Hard-resets the timer and stops any countdown.
    pub async fn set_settings(&self, settings: PauseSettings) -> Result<Option<Event>> {
        self.request(|reply| Command::SetSettings(settings, reply)).await
    }

    /// Ask the timer task for a fresh snapshot event.
    pub async fn snapshot(&self) -> Result<Event> {
        self.request(Command::Snapshot).await
    }

    /// Latest published view, without a round trip.
    pub fn view(&self) -> TimerView {
        self.view.borrow().clone()
    }

    /// Receiver notified after every mutation.
    pub fn subscribe_view(&self) -> watch::Receiver<TimerView> {
        self.view.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Stop the timer task. Other handles will see `RunnerClosed` afterwards.
    pub async fn shutdown(&self) -> Result<()> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| CoreError::RunnerClosed)
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(make(reply_tx))
            .await
            .map_err(|_| CoreError::RunnerClosed)?;
        reply_rx.await.map_err(|_| CoreError::RunnerClosed)
    }
}

/// Task state: the timer plus its (optional) tick source.
pub struct TimerRunner<G> {
    timer: PhaseTimer<G>,
    period: Duration,
    ticker: Option<Interval>,
    /// Ticks left before a `start_for` run stops itself.
    tick_budget: Option<u64>,
    commands: mpsc::Receiver<Command>,
    view: watch::Sender<TimerView>,
    events: broadcast::Sender<Event>,
}

impl<G: Gateway + 'static> TimerRunner<G> {
    /// Spawn a task owning `timer`, ticking every `period` while running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(timer: PhaseTimer<G>, period: Duration) -> (TimerHandle, JoinHandle<()>) {
        // Interval panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(timer.view());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = TimerHandle {
            commands: commands_tx,
            view: view_rx,
            events: events_tx.clone(),
        };
        let runner = TimerRunner {
            timer,
            period,
            ticker: None,
            tick_budget: None,
            commands: commands_rx,
            view: view_tx,
            events: events_tx,
        };
        (handle, tokio::spawn(runner.run()))
    }

    async fn run(mut self) {
        info!(period_ms = self.period.as_millis() as u64, "timer task started");
        loop {
            // Ticks first: when a command and overdue ticks are both ready,
            // the ticks that were due before the command land first.
            let step = tokio::select! {
                biased;
                _ = next_tick(&mut self.ticker) => Step::Tick,
                command = self.commands.recv() => Step::Command(command),
            };

            match step {
                Step::Tick => {
                    let event = self.timer.tick();
                    self.publish(event);
                    if let Some(left) = self.tick_budget.as_mut() {
                        *left = left.saturating_sub(1);
                        if *left == 0 {
                            self.end_tick_budget();
                        }
                    }
                }
                Step::Command(None) | Step::Command(Some(Command::Shutdown)) => break,
                Step::Command(Some(command)) => self.handle(command),
            }
        }
        self.release_ticker();
        info!("timer task stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start(budget, reply) => {
                let event = self.timer.start();
                if event.is_some() {
                    let first = Instant::now() + self.period;
                    self.ticker = Some(interval_at(first, self.period));
                    self.tick_budget = budget;
                }
                self.reply(reply, event);
                if self.tick_budget == Some(0) {
                    self.end_tick_budget();
                }
            }
            Command::Stop(reply) => {
                let event = self.timer.stop();
                self.release_ticker();
                self.reply(reply, event);
            }
            Command::Reset(reply) => {
                // Subscribers see the stop before the reset.
                let stopped = self.timer.stop();
                self.release_ticker();
                self.publish(stopped);
                let event = self.timer.reset();
                self.reply(reply, event);
            }
            Command::Skip(reply) => {
                let event = self.timer.skip();
                self.reply(reply, event);
            }
            Command::SetSettings(settings, reply) => {
                let event = self.timer.set_settings(settings);
                self.release_ticker();
                self.reply(reply, event);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.timer.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn release_ticker(&mut self) {
        self.ticker = None;
        self.tick_budget = None;
    }

    fn end_tick_budget(&mut self) {
        self.release_ticker();
        let event = self.timer.stop();
        debug!("tick budget spent, timer stopped");
        self.publish(event);
    }

    fn reply(&self, reply: oneshot::Sender<Option<Event>>, event: Option<Event>) {
        self.publish(event.clone());
        if reply.send(event).is_err() {
            debug!("command caller went away before the reply");
        }
    }

    fn publish(&self, event: Option<Event>) {
        self.view.send_replace(self.timer.view());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::NoopGateway;
    use crate::timer::Phase;

    fn spawn(break_min: u64, work_min: u64) -> (TimerHandle, JoinHandle<()>) {
        let timer = PhaseTimer::new(PauseSettings::new(break_min, work_min), NoopGateway);
        TimerRunner::spawn(timer, TICK_PERIOD)
    }

    async fn settle(handle: &TimerHandle) -> TimerView {
        // A round trip through the task drains every tick that is already due.
        handle.snapshot().await.unwrap();
        handle.view()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_while_running() {
        let (handle, _task) = spawn(10, 60);
        assert!(handle.start().await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(5)).await;
        let view = settle(&handle).await;
        assert_eq!(view.state.time_remaining_seconds, 3595);
        assert_eq!(view.formatted_time, "59:55");
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_does_not_double_tick() {
        let (handle, _task) = spawn(10, 60);
        handle.start().await.unwrap();
        assert!(handle.start().await.unwrap().is_none());

        tokio::time::advance(Duration::from_secs(3)).await;
        let view = settle(&handle).await;
        assert_eq!(view.state.time_remaining_seconds, 3597);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_releases_tick_source() {
        let (handle, _task) = spawn(10, 60);
        handle.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        handle.stop().await.unwrap();
        let frozen = settle(&handle).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        let later = settle(&handle).await;
        assert_eq!(frozen, later);
        assert!(!later.state.is_running);
        assert_eq!(later.state.time_remaining_seconds, 3598);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_change_while_running_resets() {
        let (handle, _task) = spawn(10, 60);
        handle.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(4)).await;
        handle.set_settings(PauseSettings::new(5, 25)).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        let view = settle(&handle).await;
        assert!(!view.state.is_running);
        assert_eq!(view.state.current_phase, Phase::Work);
        assert_eq!(view.state.time_remaining_seconds, 1500);
        assert_eq!(view.state.total_break_seconds, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_broadcast() {
        let (handle, _task) = spawn(1, 5);
        let mut events = handle.subscribe_events();
        handle.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(300)).await;
        settle(&handle).await;

        assert!(matches!(events.recv().await.unwrap(), Event::TimerStarted { .. }));
        assert!(matches!(
            events.recv().await.unwrap(),
            Event::PhaseCompleted { from: Phase::Work, to: Phase::Break, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn start_for_stops_after_exact_tick_count() {
        let (handle, _task) = spawn(1, 5);
        let mut events = handle.subscribe_events();
        assert!(handle.start_for(3).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(10)).await;
        let view = settle(&handle).await;
        assert!(!view.state.is_running);
        assert_eq!(view.state.time_remaining_seconds, 297);

        assert!(matches!(events.recv().await.unwrap(), Event::TimerStarted { .. }));
        assert!(matches!(
            events.recv().await.unwrap(),
            Event::TimerStopped { remaining_secs: 297, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn start_for_zero_stops_immediately() {
        let (handle, _task) = spawn(1, 5);
        handle.start_for(0).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        let view = settle(&handle).await;
        assert!(!view.state.is_running);
        assert_eq!(view.state.time_remaining_seconds, 300);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_stop_clears_tick_budget() {
        let (handle, _task) = spawn(1, 5);
        handle.start_for(2).await.unwrap();
        handle.stop().await.unwrap();
        handle.start().await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        let view = settle(&handle).await;
        assert!(view.state.is_running);
        assert_eq!(view.state.time_remaining_seconds, 295);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_broadcasts_stop_then_reset() {
        let (handle, _task) = spawn(10, 60);
        let mut events = handle.subscribe_events();
        handle.start().await.unwrap();
        let reply = handle.reset().await.unwrap();
        assert!(matches!(reply, Some(Event::TimerReset { .. })));

        assert!(matches!(events.recv().await.unwrap(), Event::TimerStarted { .. }));
        assert!(matches!(events.recv().await.unwrap(), Event::TimerStopped { .. }));
        assert!(matches!(events.recv().await.unwrap(), Event::TimerReset { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handles_ends_task() {
        let (handle, task) = spawn(10, 60);
        handle.start().await.unwrap();
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_other_handles() {
        let (handle, task) = spawn(10, 60);
        let other = handle.clone();
        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert!(matches!(other.start().await, Err(CoreError::RunnerClosed)));
    }
}
