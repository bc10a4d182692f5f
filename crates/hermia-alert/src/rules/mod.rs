//! Rule configuration: one rule per channel, each a [`Comparison`] plus
//! [`SeverityCuts`]. Rules own no state and are re-read every cycle.

pub mod threshold;

pub use threshold::{Comparison, SeverityCuts};

use crate::error::{ConfigError, Result};
use hermia_common::types::Channel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub channel: Channel,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub comparison: Comparison,
    pub cuts: SeverityCuts,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    pub fn new(channel: Channel, comparison: Comparison, cuts: SeverityCuts) -> Self {
        Self {
            channel,
            enabled: true,
            comparison,
            cuts,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.comparison.is_finite() {
            return Err(ConfigError::NonFiniteThreshold {
                channel: self.channel,
            });
        }
        if let Comparison::Range { low, high } = self.comparison {
            if low > high {
                return Err(ConfigError::InvertedRange {
                    channel: self.channel,
                    low,
                    high,
                });
            }
        }
        if !self.cuts.is_valid() {
            return Err(ConfigError::InvalidCuts {
                channel: self.channel,
                medium: self.cuts.medium,
                high: self.cuts.high,
            });
        }
        Ok(())
    }
}

/// Validated rules, kept in fixed channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(mut rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.channel) {
                return Err(ConfigError::DuplicateRule(rule.channel));
            }
        }
        rules.sort_by_key(|r| r.channel);
        Ok(Self { rules })
    }

    /// Enabled rules in fixed channel order.
    pub fn enabled(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.enabled)
    }

    pub fn get(&self, channel: Channel) -> Option<&Rule> {
        self.rules.iter().find(|r| r.channel == channel)
    }
}
