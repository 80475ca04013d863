mod engine;
mod phase;
mod runner;

pub use engine::PhaseTimer;
pub use phase::{Phase, TimerState, TimerView};
pub use runner::{TimerHandle, TimerRunner, TICK_PERIOD};
