//! # fmtx-core - Core Domain Types
//!
//! Foundation crate for the FM transmitter session controller. Provides
//! domain types, band configuration, driver events, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies**.
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`SessionState`] - Off / On (transmitting) / Searching (receive-scan)
//! - [`DeviceKind`] - Transmitter or receiver device mode
//! - [`Frequency`] - Station frequency in kHz
//! - [`CallState`], [`InterruptSnapshot`], [`InterruptLevel`] - Interruption sources
//! - [`SearchRequest`] - Station-list search parameters
//! - [`TxPowerLevel`], [`PowerMode`] - Power settings
//!
//! ### Band Configuration (`radio`)
//! - [`FmConfig`] - Band, spacing, emphasis, RDS standard and limits
//!
//! ### Events (`events`)
//! - [`DriverEvent`] - Asynchronous driver callbacks
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context

pub mod error;
pub mod events;
pub mod logging;
pub mod prelude;
pub mod radio;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{DriverEvent, DriverEventReceiver, DriverEventSender};
pub use radio::{ChannelSpacing, Emphasis, FmConfig, RadioBand, RdsStandard};
pub use types::{
    CallState, DeviceKind, Frequency, InterruptLevel, InterruptSnapshot, PowerMode,
    RdsProgram, SearchDirection, SearchMode, SearchRequest, SessionState, TxPowerLevel,
};
