use crate::error::{ConfigError, Result};
use crate::rules::{Comparison, Rule, SeverityCuts};
use hermia_common::types::Channel;
use serde::{Deserialize, Serialize};

/// Immutable evaluation settings passed into the engine once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of most recent readings inspected per cycle
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Breaching readings required in the window before a rule may trigger
    #[serde(default = "default_quorum")]
    pub quorum: usize,
    /// Readings retained by the store; never below `window_size`
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    #[serde(default)]
    pub hysteresis: Hysteresis,
    #[serde(default = "default_rules")]
    pub rules: Vec<Rule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            quorum: default_quorum(),
            store_capacity: default_store_capacity(),
            hysteresis: Hysteresis::default(),
            rules: default_rules(),
        }
    }
}

impl EngineConfig {
    /// Checks the window, quorum, store and hysteresis settings. Rules are
    /// checked by [`crate::rules::RuleSet::new`].
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.quorum == 0 || self.quorum > self.window_size {
            return Err(ConfigError::InvalidQuorum {
                quorum: self.quorum,
                window_size: self.window_size,
            });
        }
        if self.store_capacity < self.window_size {
            return Err(ConfigError::StoreTooSmall {
                capacity: self.store_capacity,
                window_size: self.window_size,
            });
        }
        for channel in Channel::ALL {
            let value = self.hysteresis.margin(channel);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidHysteresis { channel, value });
            }
        }
        Ok(())
    }
}

fn default_window_size() -> usize {
    5
}

fn default_quorum() -> usize {
    3
}

fn default_store_capacity() -> usize {
    10_000
}

/// Fixed per-channel hysteresis margins, applied only when counting breaches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hysteresis {
    #[serde(default = "default_vibration_margin")]
    pub vibration: f64,
    #[serde(default = "default_air_quality_margin")]
    pub air_quality: f64,
    #[serde(default = "default_luminosity_margin")]
    pub luminosity: f64,
    #[serde(default = "default_temperature_margin")]
    pub temperature: f64,
}

impl Default for Hysteresis {
    fn default() -> Self {
        Self {
            vibration: default_vibration_margin(),
            air_quality: default_air_quality_margin(),
            luminosity: default_luminosity_margin(),
            temperature: default_temperature_margin(),
        }
    }
}

impl Hysteresis {
    pub fn margin(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Vibration => self.vibration,
            Channel::AirQuality => self.air_quality,
            Channel::Luminosity => self.luminosity,
            Channel::Temperature => self.temperature,
        }
    }
}

fn default_vibration_margin() -> f64 {
    0.05
}

fn default_air_quality_margin() -> f64 {
    5.0
}

fn default_luminosity_margin() -> f64 {
    50.0
}

fn default_temperature_margin() -> f64 {
    2.0
}

/// Default rule set: vibration at or above 0.8, air quality at or below 60,
/// luminosity within 300..800 and temperature within 18..32.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Channel::Vibration,
            Comparison::MinThreshold { threshold: 0.8 },
            SeverityCuts {
                medium: 0.15,
                high: 0.40,
            },
        ),
        Rule::new(
            Channel::AirQuality,
            Comparison::MaxThreshold { threshold: 60.0 },
            SeverityCuts {
                medium: 10.0,
                high: 20.0,
            },
        ),
        Rule::new(
            Channel::Luminosity,
            Comparison::Range {
                low: 300.0,
                high: 800.0,
            },
            SeverityCuts {
                medium: 120.0,
                high: 250.0,
            },
        ),
        Rule::new(
            Channel::Temperature,
            Comparison::Range {
                low: 18.0,
                high: 32.0,
            },
            SeverityCuts {
                medium: 3.0,
                high: 6.0,
            },
        ),
    ]
}
