use hermia_common::types::Severity;
use serde::{Deserialize, Serialize};

/// How a rule compares a channel value against its configured limits.
///
/// `MinThreshold` fires at or above the threshold, `MaxThreshold` at or
/// below it, `Range` outside `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Comparison {
    MinThreshold { threshold: f64 },
    MaxThreshold { threshold: f64 },
    Range { low: f64, high: f64 },
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinThreshold { threshold } => write!(f, ">= {threshold}"),
            Self::MaxThreshold { threshold } => write!(f, "<= {threshold}"),
            Self::Range { low, high } => write!(f, "outside [{low}, {high}]"),
        }
    }
}

/// Absolute slack for comparisons against a shifted limit, so that decimal
/// limits like `0.8 + 0.05` still include a reading of exactly `0.85`.
fn tolerance(limit: f64) -> f64 {
    1e-9 * limit.abs().max(1.0)
}

impl Comparison {
    /// Whether `value` breaches once `hysteresis` is added past the raw limit.
    /// The shifted limit itself counts for threshold kinds and does not for
    /// ranges.
    pub fn breaches(&self, value: f64, hysteresis: f64) -> bool {
        match *self {
            Self::MinThreshold { threshold } => {
                let limit = threshold + hysteresis;
                value >= limit - tolerance(limit)
            }
            Self::MaxThreshold { threshold } => {
                let limit = threshold - hysteresis;
                value <= limit + tolerance(limit)
            }
            Self::Range { low, high } => {
                let lower = low - hysteresis;
                let upper = high + hysteresis;
                value < lower - tolerance(lower) || value > upper + tolerance(upper)
            }
        }
    }

    /// Distance of `value` past the raw limit, `None` while inside the
    /// acceptable zone. Hysteresis never applies here.
    pub fn distance(&self, value: f64) -> Option<f64> {
        let delta = match *self {
            Self::MinThreshold { threshold } => value - threshold,
            Self::MaxThreshold { threshold } => threshold - value,
            Self::Range { low, high } => {
                if value < low {
                    low - value
                } else if value > high {
                    value - high
                } else {
                    return None;
                }
            }
        };
        (delta >= 0.0).then_some(delta)
    }

    pub(crate) fn is_finite(&self) -> bool {
        match *self {
            Self::MinThreshold { threshold } | Self::MaxThreshold { threshold } => {
                threshold.is_finite()
            }
            Self::Range { low, high } => low.is_finite() && high.is_finite(),
        }
    }
}

/// Distance cut points for the medium and high tiers. Anything past the raw
/// limit but short of `medium` grades low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityCuts {
    pub medium: f64,
    pub high: f64,
}

impl SeverityCuts {
    pub fn tier(&self, distance: f64) -> Severity {
        if distance >= self.high - tolerance(self.high) {
            Severity::High
        } else if distance >= self.medium - tolerance(self.medium) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.medium.is_finite()
            && self.high.is_finite()
            && self.medium >= 0.0
            && self.medium <= self.high
    }
}
