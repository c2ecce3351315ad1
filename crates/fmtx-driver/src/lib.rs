//! # fmtx-driver - FM Hardware Driver Handle
//!
//! The seam between the session controller and the FM chip. The chip exposes
//! two mutually exclusive device modes, a transmitter and a scanning
//! receiver, each opened from an [`FmHardware`] handle and driven through
//! synchronous calls. Completion callbacks come back asynchronously as
//! [`fmtx_core::DriverEvent`]s on the sender supplied at open time.
//!
//! Depends on [`fmtx_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`FmHardware`] - Opens transmitter/receiver device handles
//! - [`Transmitter`] - Transmit-mode device operations (enable, tune, power, RDS)
//! - [`Receiver`] - Receive-scan device operations (enable, search, station list)
//! - [`ops`] - Operation names used in hardware error reports
//!
//! With the `test-helpers` feature, [`test_utils::MockHardware`] provides a
//! scripted in-memory chip that records every call.

pub mod hardware;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use hardware::{ops, FmHardware, Receiver, Transmitter};
