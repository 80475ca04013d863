//! Core error types for pauseroom-core.
//!
//! The phase timer itself never fails. These types cover the edges around it:
//! configuration files, settings validation and the notification gateway.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pauseroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Notification gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// The timer runner task is gone (shut down or panicked).
    #[error("Timer runner is no longer running")]
    RunnerClosed,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timer settings out of range. Holds every message, in check order.
    #[error("{}", .0.join("; "))]
    Settings(Vec<String>),
}

impl ValidationError {
    /// Human-readable messages carried by this error.
    pub fn messages(&self) -> &[String] {
        match self {
            ValidationError::Settings(messages) => messages,
        }
    }
}

/// Failures reported by a notification gateway.
///
/// The phase timer logs and drops these; they exist so gateway
/// implementations have something honest to return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The host refused notification permission.
    #[error("notification permission denied")]
    PermissionDenied,

    /// The receiving side of a channel gateway has gone away.
    #[error("notification dispatcher disconnected")]
    Disconnected,

    /// Any other delivery failure.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
