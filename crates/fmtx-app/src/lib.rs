//! fmtx-app - Session controller and orchestration for the FM transmitter
//!
//! This crate implements the interruption source tracker, the pure
//! transition function, the session controller, the client callback sink,
//! the single-actor Engine that serializes every entry point, and
//! configuration loading.

pub mod config;
pub mod controller;
pub mod engine;
pub mod engine_event;
pub mod interrupts;
pub mod listener;
pub mod message;
pub mod process;
pub mod state;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod transition;

// Re-export primary types
pub use config::{ConfigSource, Settings, SharedConfig, TransmitterSettings};
pub use controller::{SessionController, RADIO_TEXT};
pub use engine::{Engine, EngineHandle};
pub use engine_event::EngineEvent;
pub use interrupts::{InterruptTracker, LineId};
pub use listener::{ClientListener, ListenerSlot};
pub use message::{Message, StatusReport, TrackMetadata};
pub use state::ControllerState;
pub use transition::{derive_transition, Transition, TransitionInput};
