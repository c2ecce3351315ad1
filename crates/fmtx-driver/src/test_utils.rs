//! Test utilities for driver types
//!
//! [`MockHardware`] is an in-memory FM chip. Clones share one state, so a
//! test keeps a clone to script failures and inspect the call log while the
//! controller owns another.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use fmtx_core::prelude::*;
use fmtx_core::{
    DeviceKind, DriverEvent, DriverEventSender, FmConfig, Frequency, PowerMode, RdsProgram,
    SearchRequest, TxPowerLevel,
};

use crate::hardware::{ops, FmHardware, Receiver, Transmitter};

/// One recorded driver call
#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Open(DeviceKind),
    Enable(DeviceKind),
    Disable(DeviceKind),
    Configure,
    SetStation(DeviceKind, Frequency),
    SetTxPowerLevel(u8),
    SetPowerMode(PowerMode),
    SetRdsOn,
    StartPsInfo(String),
    StartRtInfo(String),
    SearchStationList(SearchRequest),
    CancelSearch,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<HwCall>,
    failing: HashSet<(DeviceKind, &'static str)>,
    unavailable: HashSet<DeviceKind>,
    enabled: HashSet<DeviceKind>,
    overlap_detected: bool,
    station_list: Vec<Frequency>,
    internal_antenna: bool,
    events: Option<DriverEventSender>,
}

/// Scripted FM chip recording every call
#[derive(Debug, Clone)]
pub struct MockHardware {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHardware {
    pub fn new() -> Self {
        let state = MockState {
            internal_antenna: true,
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `op` on `device` fail from now on
    pub fn fail(&self, device: DeviceKind, op: &'static str) {
        self.lock().failing.insert((device, op));
    }

    /// Let `op` on `device` succeed again
    pub fn heal(&self, device: DeviceKind, op: &'static str) {
        self.lock().failing.remove(&(device, op));
    }

    /// Make opening `device` fail from now on
    pub fn make_unavailable(&self, device: DeviceKind) {
        self.lock().unavailable.insert(device);
    }

    pub fn set_station_list(&self, stations: Vec<Frequency>) {
        self.lock().station_list = stations;
    }

    pub fn set_internal_antenna(&self, available: bool) {
        self.lock().internal_antenna = available;
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of recorded calls equal to `call`
    pub fn count(&self, call: &HwCall) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Devices currently powered up
    pub fn enabled_devices(&self) -> HashSet<DeviceKind> {
        self.lock().enabled.clone()
    }

    /// Whether both devices were ever enabled at the same time
    pub fn overlap_detected(&self) -> bool {
        self.lock().overlap_detected
    }

    /// Raise a driver callback on the most recently opened device's channel
    pub fn emit(&self, event: DriverEvent) -> bool {
        self.lock()
            .events
            .as_ref()
            .map(|tx| tx.send(event).is_ok())
            .unwrap_or(false)
    }

    fn call(&self, device: DeviceKind, op: &'static str, call: HwCall) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&(device, op)) {
            return Err(Error::hardware(device, op));
        }
        match op {
            ops::ENABLE => {
                let other = match device {
                    DeviceKind::Transmitter => DeviceKind::Receiver,
                    DeviceKind::Receiver => DeviceKind::Transmitter,
                };
                if state.enabled.contains(&other) {
                    state.overlap_detected = true;
                }
                state.enabled.insert(device);
            }
            ops::DISABLE => {
                state.enabled.remove(&device);
            }
            _ => {}
        }
        Ok(())
    }

    fn open(&self, device: DeviceKind, events: DriverEventSender) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(HwCall::Open(device));
        if state.unavailable.contains(&device) {
            return Err(Error::unavailable(device));
        }
        state.events = Some(events);
        Ok(())
    }
}

impl FmHardware for MockHardware {
    fn open_transmitter(&mut self, events: DriverEventSender) -> Result<Box<dyn Transmitter>> {
        self.open(DeviceKind::Transmitter, events)?;
        Ok(Box::new(MockTransmitter { hw: self.clone() }))
    }

    fn open_receiver(&mut self, events: DriverEventSender) -> Result<Box<dyn Receiver>> {
        self.open(DeviceKind::Receiver, events)?;
        Ok(Box::new(MockReceiver { hw: self.clone() }))
    }
}

struct MockTransmitter {
    hw: MockHardware,
}

const TX: DeviceKind = DeviceKind::Transmitter;
const RX: DeviceKind = DeviceKind::Receiver;

impl Transmitter for MockTransmitter {
    fn enable(&mut self, _config: &FmConfig) -> Result<()> {
        self.hw.call(TX, ops::ENABLE, HwCall::Enable(TX))
    }

    fn disable(&mut self) -> Result<()> {
        self.hw.call(TX, ops::DISABLE, HwCall::Disable(TX))
    }

    fn configure(&mut self, _config: &FmConfig) -> Result<()> {
        self.hw.call(TX, ops::CONFIGURE, HwCall::Configure)
    }

    fn set_station(&mut self, frequency: Frequency) -> Result<()> {
        self.hw
            .call(TX, ops::SET_STATION, HwCall::SetStation(TX, frequency))
    }

    fn set_tx_power_level(&mut self, level: TxPowerLevel) -> Result<()> {
        self.hw.call(
            TX,
            ops::SET_TX_POWER_LEVEL,
            HwCall::SetTxPowerLevel(level.value()),
        )
    }

    fn set_power_mode(&mut self, mode: PowerMode) -> Result<()> {
        self.hw
            .call(TX, ops::SET_POWER_MODE, HwCall::SetPowerMode(mode))
    }

    fn set_rds_on(&mut self) -> Result<()> {
        self.hw.call(TX, ops::SET_RDS_ON, HwCall::SetRdsOn)
    }

    fn start_ps_info(
        &mut self,
        text: &str,
        _program: RdsProgram,
        _repeat_count: u32,
    ) -> Result<()> {
        self.hw
            .call(TX, ops::START_PS_INFO, HwCall::StartPsInfo(text.to_string()))
    }

    fn start_rt_info(&mut self, text: &str, _program: RdsProgram) -> Result<()> {
        self.hw
            .call(TX, ops::START_RT_INFO, HwCall::StartRtInfo(text.to_string()))
    }
}

struct MockReceiver {
    hw: MockHardware,
}

impl Receiver for MockReceiver {
    fn enable(&mut self, _config: &FmConfig) -> Result<()> {
        self.hw.call(RX, ops::ENABLE, HwCall::Enable(RX))
    }

    fn disable(&mut self) -> Result<()> {
        self.hw.call(RX, ops::DISABLE, HwCall::Disable(RX))
    }

    fn set_station(&mut self, frequency: Frequency) -> Result<()> {
        self.hw
            .call(RX, ops::SET_STATION, HwCall::SetStation(RX, frequency))
    }

    fn search_station_list(&mut self, request: &SearchRequest) -> Result<()> {
        self.hw.call(
            RX,
            ops::SEARCH_STATION_LIST,
            HwCall::SearchStationList(*request),
        )
    }

    fn cancel_search(&mut self) -> Result<()> {
        self.hw.call(RX, ops::CANCEL_SEARCH, HwCall::CancelSearch)
    }

    fn station_list(&mut self) -> Vec<Frequency> {
        self.hw.lock().station_list.clone()
    }

    fn internal_antenna(&mut self) -> bool {
        self.hw.lock().internal_antenna
    }
}
