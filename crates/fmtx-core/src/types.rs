//! Core domain types for the session controller

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────

/// Logical mode of the single FM tuner.
///
/// Exactly one variant holds at a time, and the enabled hardware device
/// always matches it: no device for `Off`, the transmitter for `On`, the
/// receiver for `Searching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Off,
    On,
    Searching,
}

impl SessionState {
    /// The hardware device that must be enabled in this state
    pub fn device(self) -> Option<DeviceKind> {
        match self {
            SessionState::Off => None,
            SessionState::On => Some(DeviceKind::Transmitter),
            SessionState::Searching => Some(DeviceKind::Receiver),
        }
    }

    pub fn is_on(self) -> bool {
        self == SessionState::On
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Off => "off",
            SessionState::On => "on",
            SessionState::Searching => "searching",
        };
        f.write_str(label)
    }
}

/// The two mutually exclusive hardware device modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Transmitter,
    Receiver,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Transmitter => f.write_str("transmitter"),
            DeviceKind::Receiver => f.write_str("receiver"),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Frequency
// ─────────────────────────────────────────────────────────

/// A station frequency in kHz, as the driver reports and accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(u32);

impl Frequency {
    pub const fn from_khz(khz: u32) -> Self {
        Self(khz)
    }

    pub const fn khz(self) -> u32 {
        self.0
    }

    pub fn mhz(self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.mhz())
    }
}

// ─────────────────────────────────────────────────────────
// Interruption Sources
// ─────────────────────────────────────────────────────────

/// Telephony call state reported for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallState {
    #[default]
    Idle,
    Ringing,
    Offhook,
}

impl CallState {
    /// Whether this call state interrupts the transmitter.
    ///
    /// A ringing call with the ring volume at zero is exempt.
    pub fn interrupts(self, ring_volume: u32) -> bool {
        match self {
            CallState::Idle => false,
            CallState::Ringing => ring_volume > 0,
            CallState::Offhook => true,
        }
    }
}

/// Aggregate interruption level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptLevel {
    /// No interruption source is active
    #[default]
    Clear,
    /// At least one interruption source is active
    Raised,
}

/// Latest value of every interruption source flag.
///
/// The level is always recomputed from these flags and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptSnapshot {
    pub call_active: bool,
    pub headset_plugged: bool,
    pub a2dp_playing: bool,
    pub hdmi_connected: bool,
}

impl InterruptSnapshot {
    pub fn level(&self) -> InterruptLevel {
        if self.call_active || self.headset_plugged || self.a2dp_playing || self.hdmi_connected {
            InterruptLevel::Raised
        } else {
            InterruptLevel::Clear
        }
    }
}

// ─────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────

/// Which stations a station-list search collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Strongest,
    Weakest,
}

/// Direction of a station-list search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Up,
    Down,
}

/// A station-list search, alive only for the duration of the driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub max_stations: u32,
    pub direction: SearchDirection,
    pub mode: SearchMode,
    /// Start offset in the band, in channels
    pub offset: u32,
}

impl SearchRequest {
    /// Search upward for the weakest (emptiest) channels to transmit on
    pub fn weakest(max_stations: u32) -> Self {
        Self {
            max_stations,
            direction: SearchDirection::Up,
            mode: SearchMode::Weakest,
            offset: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────
// RDS
// ─────────────────────────────────────────────────────────

/// Programme type and identifier sent with every RDS group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdsProgram {
    pub program_type: u8,
    pub program_id: u16,
}

impl Default for RdsProgram {
    fn default() -> Self {
        Self {
            program_type: 0,
            program_id: 0x1234,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Power
// ─────────────────────────────────────────────────────────

/// Transmit output power level (0 = lowest, 7 = highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TxPowerLevel(u8);

impl TxPowerLevel {
    pub const MAX: TxPowerLevel = TxPowerLevel(7);

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX.0).then_some(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for TxPowerLevel {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<u8> for TxPowerLevel {
    type Error = String;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("tx power level {level} out of range 0..=7"))
    }
}

impl From<TxPowerLevel> for u8 {
    fn from(level: TxPowerLevel) -> u8 {
        level.0
    }
}

/// Chip power mode, lowered while no client is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Normal,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_default_is_off() {
        assert_eq!(SessionState::default(), SessionState::Off);
        assert_eq!(SessionState::Off.device(), None);
        assert_eq!(SessionState::On.device(), Some(DeviceKind::Transmitter));
        assert_eq!(SessionState::Searching.device(), Some(DeviceKind::Receiver));
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::from_khz(91_500).to_string(), "91.5 MHz");
        assert_eq!(Frequency::from_khz(101_100).khz(), 101_100);
    }

    #[test]
    fn test_silent_ring_does_not_interrupt() {
        assert!(!CallState::Ringing.interrupts(0));
        assert!(CallState::Ringing.interrupts(5));
        assert!(CallState::Offhook.interrupts(0));
        assert!(!CallState::Idle.interrupts(7));
    }

    #[test]
    fn test_level_is_or_of_all_flags() {
        let clear = InterruptSnapshot::default();
        assert_eq!(clear.level(), InterruptLevel::Clear);

        for flag in 0..4 {
            let mut snap = InterruptSnapshot::default();
            match flag {
                0 => snap.call_active = true,
                1 => snap.headset_plugged = true,
                2 => snap.a2dp_playing = true,
                _ => snap.hdmi_connected = true,
            }
            assert_eq!(snap.level(), InterruptLevel::Raised);
        }
    }

    #[test]
    fn test_weakest_search_request() {
        let req = SearchRequest::weakest(12);
        assert_eq!(req.max_stations, 12);
        assert_eq!(req.direction, SearchDirection::Up);
        assert_eq!(req.mode, SearchMode::Weakest);
        assert_eq!(req.offset, 0);
    }

    #[test]
    fn test_tx_power_level_bounds() {
        assert_eq!(TxPowerLevel::default(), TxPowerLevel::MAX);
        assert!(TxPowerLevel::new(8).is_none());
        assert_eq!(TxPowerLevel::new(3).map(TxPowerLevel::value), Some(3));
    }
}
