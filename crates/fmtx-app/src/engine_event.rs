//! Domain events emitted by the Engine for external consumers
//!
//! Observers (notification renderers, system-wide "FM TX" listeners, tests)
//! subscribe via `Engine::subscribe()` and see events in the order the
//! controller produced them.

use fmtx_core::{Frequency, SessionState};

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────
    /// The logical session state changed
    SessionStateChanged {
        old: SessionState,
        new: SessionState,
    },

    /// System-wide transmitter broadcast, raised on enable and on every turn-off
    TransmitterStateChanged { on: bool },

    // ─────────────────────────────────────────────────────────
    // Notification
    // ─────────────────────────────────────────────────────────
    /// The ongoing notification should show (or refresh) this frequency
    NotificationUpdated { frequency: Option<Frequency> },

    /// The ongoing notification should be removed
    NotificationCleared,

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStateChanged { .. } => "session_state_changed",
            Self::TransmitterStateChanged { .. } => "transmitter_state_changed",
            Self::NotificationUpdated { .. } => "notification_updated",
            Self::NotificationCleared => "notification_cleared",
            Self::Shutdown => "shutdown",
        }
    }
}
