//! Configuration for the FM transmitter controller
//!
//! Supports:
//! - `.fmtx/config.toml` - Band configuration and transmitter settings
//! - [`ConfigSource`] - Read-only view of the band configuration the
//!   controller re-reads on every enable/reconfigure

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, read_settings, save_settings};
pub use types::*;
