//! Configuration types for the FM transmitter controller
//!
//! Defines:
//! - `Settings` - Everything loaded from `.fmtx/config.toml`
//! - `TransmitterSettings` - Power, settle interval and RDS identification
//! - `ConfigSource` / `SharedConfig` - Live band configuration

use std::sync::{Arc, RwLock};
use std::time::Duration;

use fmtx_core::{FmConfig, RdsProgram, TxPowerLevel};
use serde::{Deserialize, Serialize};

/// Global settings loaded from `.fmtx/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub radio: FmConfig,

    #[serde(default)]
    pub transmitter: TransmitterSettings,
}

/// Transmitter behaviour that is not part of the band configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransmitterSettings {
    /// Output power applied right after enable (0-7)
    #[serde(default)]
    pub power_level: TxPowerLevel,

    /// Time the chip needs to switch between transmit and receive paths
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Programme-service text pushed after every tune
    #[serde(default = "default_ps_text")]
    pub ps_text: String,

    /// Programme type and identifier for RDS groups
    #[serde(default)]
    pub program: RdsProgram,

    /// How often the PS text is repeated per cycle
    #[serde(default = "default_ps_repeat_count")]
    pub ps_repeat_count: u32,
}

impl TransmitterSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for TransmitterSettings {
    fn default() -> Self {
        Self {
            power_level: TxPowerLevel::default(),
            settle_ms: default_settle_ms(),
            ps_text: default_ps_text(),
            program: RdsProgram::default(),
            ps_repeat_count: default_ps_repeat_count(),
        }
    }
}

fn default_settle_ms() -> u64 {
    100
}

fn default_ps_text() -> String {
    "QFMRADIO".to_string()
}

fn default_ps_repeat_count() -> u32 {
    1
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Source
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only source of the current band configuration.
///
/// Owned by an external preferences collaborator; the controller only reads.
pub trait ConfigSource: Send {
    fn fm_config(&self) -> FmConfig;
}

/// Band configuration shared with whoever edits the preferences.
///
/// Clones share the same value; `set` is picked up by the next
/// `turn_on`, `reconfigure` or search.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<FmConfig>>,
}

impl SharedConfig {
    pub fn new(config: FmConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn set(&self, config: FmConfig) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = config;
    }
}

impl ConfigSource for SharedConfig {
    fn fm_config(&self) -> FmConfig {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigSource for FmConfig {
    fn fm_config(&self) -> FmConfig {
        *self
    }
}
