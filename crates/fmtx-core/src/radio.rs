//! FM band configuration handed to the driver on enable/configure

use serde::{Deserialize, Serialize};

use crate::types::Frequency;

/// Regional FM band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioBand {
    #[default]
    UsEurope,
    Japan,
    JapanWide,
    User,
}

impl RadioBand {
    /// Standard band edges in kHz; `User` has none
    pub fn limits(self) -> Option<(Frequency, Frequency)> {
        match self {
            RadioBand::UsEurope => Some((Frequency::from_khz(87_500), Frequency::from_khz(108_000))),
            RadioBand::Japan => Some((Frequency::from_khz(76_000), Frequency::from_khz(90_000))),
            RadioBand::JapanWide => Some((Frequency::from_khz(76_000), Frequency::from_khz(108_000))),
            RadioBand::User => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSpacing {
    #[serde(rename = "200khz")]
    Khz200,
    #[default]
    #[serde(rename = "100khz")]
    Khz100,
    #[serde(rename = "50khz")]
    Khz50,
}

impl ChannelSpacing {
    pub fn khz(self) -> u32 {
        match self {
            ChannelSpacing::Khz200 => 200,
            ChannelSpacing::Khz100 => 100,
            ChannelSpacing::Khz50 => 50,
        }
    }
}

/// Pre-emphasis time constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Emphasis {
    #[serde(rename = "50us")]
    Us50,
    #[default]
    #[serde(rename = "75us")]
    Us75,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdsStandard {
    #[default]
    Rbds,
    Rds,
    None,
}

/// Band, spacing, emphasis, RDS standard and frequency limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmConfig {
    #[serde(default)]
    pub band: RadioBand,
    #[serde(default)]
    pub channel_spacing: ChannelSpacing,
    #[serde(default)]
    pub emphasis: Emphasis,
    #[serde(default)]
    pub rds_standard: RdsStandard,
    #[serde(default = "default_lower_limit")]
    pub lower_limit: Frequency,
    #[serde(default = "default_upper_limit")]
    pub upper_limit: Frequency,
}

impl FmConfig {
    /// Configuration for a standard band, using its edges as limits
    pub fn for_band(band: RadioBand) -> Self {
        let (lower_limit, upper_limit) = band
            .limits()
            .unwrap_or((default_lower_limit(), default_upper_limit()));
        Self {
            band,
            lower_limit,
            upper_limit,
            ..Self::default()
        }
    }

    pub fn contains(&self, frequency: Frequency) -> bool {
        (self.lower_limit..=self.upper_limit).contains(&frequency)
    }
}

impl Default for FmConfig {
    fn default() -> Self {
        Self {
            band: RadioBand::default(),
            channel_spacing: ChannelSpacing::default(),
            emphasis: Emphasis::default(),
            rds_standard: RdsStandard::default(),
            lower_limit: default_lower_limit(),
            upper_limit: default_upper_limit(),
        }
    }
}

fn default_lower_limit() -> Frequency {
    Frequency::from_khz(87_500)
}

fn default_upper_limit() -> Frequency {
    Frequency::from_khz(108_000)
}
