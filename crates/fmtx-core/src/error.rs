//! Controller error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{DeviceKind, SessionState};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Controller error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Hardware Errors
    // ─────────────────────────────────────────────────────────────
    #[error("FM {device} device not available")]
    HardwareUnavailable { device: DeviceKind },

    #[error("FM {device} call '{op}' failed")]
    Hardware { device: DeviceKind, op: &'static str },

    #[error("Cannot {op} while {state}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },

    // ─────────────────────────────────────────────────────────────
    // Client Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Client listener is gone")]
    ClientGone,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn unavailable(device: DeviceKind) -> Self {
        Self::HardwareUnavailable { device }
    }

    pub fn hardware(device: DeviceKind, op: &'static str) -> Self {
        Self::Hardware { device, op }
    }

    pub fn invalid_state(op: &'static str, state: SessionState) -> Self {
        Self::InvalidState { op, state }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {}", f(), err);
            err
        })
    }
}
