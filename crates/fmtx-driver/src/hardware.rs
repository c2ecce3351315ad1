//! Hardware driver traits
//!
//! Every call is synchronous and may block for as long as the chip takes;
//! the controller serializes all of them through its event queue. A call
//! that fails returns [`Error::Hardware`](fmtx_core::Error::Hardware) naming
//! the device and operation.

use fmtx_core::prelude::*;
use fmtx_core::{
    DriverEventSender, FmConfig, Frequency, PowerMode, RdsProgram, SearchRequest, TxPowerLevel,
};

/// Operation names used in hardware error reports
pub mod ops {
    pub const ENABLE: &str = "enable";
    pub const DISABLE: &str = "disable";
    pub const CONFIGURE: &str = "configure";
    pub const SET_STATION: &str = "setStation";
    pub const SET_TX_POWER_LEVEL: &str = "setTxPowerLevel";
    pub const SET_POWER_MODE: &str = "setPowerMode";
    pub const SET_RDS_ON: &str = "setRdsOn";
    pub const START_PS_INFO: &str = "startPSInfo";
    pub const START_RT_INFO: &str = "startRTInfo";
    pub const SEARCH_STATION_LIST: &str = "searchStationList";
    pub const CANCEL_SEARCH: &str = "cancelSearch";
}

/// Entry point to the FM chip.
///
/// Opening a device does not power it up; `enable` does. Opening fails with
/// [`Error::HardwareUnavailable`](fmtx_core::Error::HardwareUnavailable)
/// when the device node cannot be claimed.
pub trait FmHardware: Send {
    /// Open the transmit-mode device; callbacks go to `events`
    fn open_transmitter(&mut self, events: DriverEventSender) -> Result<Box<dyn Transmitter>>;

    /// Open the receive-scan device; callbacks go to `events`
    fn open_receiver(&mut self, events: DriverEventSender) -> Result<Box<dyn Receiver>>;
}

/// Transmit-mode device handle
pub trait Transmitter: Send {
    fn enable(&mut self, config: &FmConfig) -> Result<()>;

    fn disable(&mut self) -> Result<()>;

    /// Apply a new band configuration without a power cycle
    fn configure(&mut self, config: &FmConfig) -> Result<()>;

    /// Start tuning; completion arrives as `TuneStatusChanged`
    fn set_station(&mut self, frequency: Frequency) -> Result<()>;

    fn set_tx_power_level(&mut self, level: TxPowerLevel) -> Result<()>;

    fn set_power_mode(&mut self, mode: PowerMode) -> Result<()>;

    fn set_rds_on(&mut self) -> Result<()>;

    /// Broadcast programme-service (station name) text
    fn start_ps_info(&mut self, text: &str, program: RdsProgram, repeat_count: u32)
        -> Result<()>;

    /// Broadcast radio text
    fn start_rt_info(&mut self, text: &str, program: RdsProgram) -> Result<()>;
}

/// Receive-scan device handle
pub trait Receiver: Send {
    fn enable(&mut self, config: &FmConfig) -> Result<()>;

    fn disable(&mut self) -> Result<()>;

    fn set_station(&mut self, frequency: Frequency) -> Result<()>;

    /// Start a station-list search; completion arrives as `SearchListComplete`
    fn search_station_list(&mut self, request: &SearchRequest) -> Result<()>;

    fn cancel_search(&mut self) -> Result<()>;

    /// Stations found by the last completed search
    fn station_list(&mut self) -> Vec<Frequency>;

    fn internal_antenna(&mut self) -> bool;
}
