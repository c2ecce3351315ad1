//! FM Transmitter Library
//!
//! Session controller for a single-tuner FM transmitter/receiver that is
//! switched off and back on around calls, headsets, A2DP playback and HDMI.

pub use fmtx_app as app;
pub use fmtx_core as core;
pub use fmtx_driver as driver;

// Re-export main entry points
pub use fmtx_app::{ClientListener, Engine, EngineEvent, EngineHandle, Settings, SharedConfig};
pub use fmtx_core::{Error, Frequency, Result, SessionState};
pub use fmtx_driver::FmHardware;
