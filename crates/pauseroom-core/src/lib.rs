//! # Pauseroom Core Library
//!
//! Core logic for Pauseroom, a work/break interval timer. Work phases
//! alternate with break phases; the timer counts down, rolls into the next
//! phase at zero and tells a notification gateway when to remind the user.
//!
//! ## Architecture
//!
//! - **Phase Timer**: A synchronous state machine that requires the caller
//!   to invoke `tick()` once per second while running
//! - **Timer Runner**: A tokio task that owns one phase timer and its
//!   one-second tick source, serializing commands and ticks
//! - **Gateway**: Trait boundary for scheduled notifications and haptics
//! - **Config**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`TimerRunner`] / [`TimerHandle`]: Async owner and its command handle
//! - [`Gateway`]: Notification and haptic capability
//! - [`Config`]: Application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod settings;
pub mod time_utils;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, GatewayError, ValidationError};
pub use events::Event;
pub use gateway::{
    ChannelGateway, FeedbackKind, Gateway, GatewayRequest, ImpactStyle, NoopGateway,
    NotificationContent, NotificationKind, NotificationSink, PermissionStatus,
};
pub use settings::{validate_settings, PauseSettings};
pub use time_utils::{format_long, format_short, minutes_to_seconds, progress, seconds_to_minutes};
pub use timer::{Phase, PhaseTimer, TimerHandle, TimerRunner, TimerState, TimerView, TICK_PERIOD};
