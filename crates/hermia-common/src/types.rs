use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sensor channel carried by every [`Reading`].
///
/// The declaration order is the fixed channel order used for composite alert
/// descriptions and for probing the representative value of an alert.
///
/// # Examples
///
/// ```
/// use hermia_common::types::Channel;
///
/// let ch: Channel = "air_quality".parse().unwrap();
/// assert_eq!(ch, Channel::AirQuality);
/// assert_eq!(ch.to_string(), "air_quality");
/// assert!(Channel::Vibration < Channel::Temperature);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Vibration,
    AirQuality,
    Luminosity,
    Temperature,
}

impl Channel {
    /// All channels in fixed order.
    pub const ALL: [Channel; 4] = [
        Channel::Vibration,
        Channel::AirQuality,
        Channel::Luminosity,
        Channel::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Vibration => "vibration",
            Channel::AirQuality => "air_quality",
            Channel::Luminosity => "luminosity",
            Channel::Temperature => "temperature",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vibration" => Ok(Channel::Vibration),
            "air_quality" => Ok(Channel::AirQuality),
            "luminosity" => Ok(Channel::Luminosity),
            "temperature" => Ok(Channel::Temperature),
            _ => Err(format!("unknown channel: {s}")),
        }
    }
}

/// One timestamped multi-channel sensor reading. Any channel may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub vibration: Option<f64>,
    pub air_quality: Option<f64>,
    pub luminosity: Option<f64>,
    pub temperature: Option<f64>,
}

impl Reading {
    /// A reading with every channel missing.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            vibration: None,
            air_quality: None,
            luminosity: None,
            temperature: None,
        }
    }

    /// Builder-style setter, mostly used by collectors and tests.
    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        self.set(channel, Some(value));
        self
    }

    pub fn set(&mut self, channel: Channel, value: Option<f64>) {
        let slot = match channel {
            Channel::Vibration => &mut self.vibration,
            Channel::AirQuality => &mut self.air_quality,
            Channel::Luminosity => &mut self.luminosity,
            Channel::Temperature => &mut self.temperature,
        };
        *slot = value;
    }

    /// Value for `channel`, treating NaN as missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use hermia_common::types::{Channel, Reading};
    ///
    /// let r = Reading::new(Utc::now())
    ///     .with(Channel::Vibration, 0.42)
    ///     .with(Channel::Temperature, f64::NAN);
    /// assert_eq!(r.value(Channel::Vibration), Some(0.42));
    /// assert_eq!(r.value(Channel::Temperature), None);
    /// assert_eq!(r.value(Channel::Luminosity), None);
    /// ```
    pub fn value(&self, channel: Channel) -> Option<f64> {
        let value = match channel {
            Channel::Vibration => self.vibration,
            Channel::AirQuality => self.air_quality,
            Channel::Luminosity => self.luminosity,
            Channel::Temperature => self.temperature,
        };
        value.filter(|v| !v.is_nan())
    }

    /// First non-missing value probing channels in fixed priority order.
    pub fn representative(&self) -> Option<(Channel, f64)> {
        Channel::ALL
            .iter()
            .find_map(|&ch| self.value(ch).map(|v| (ch, v)))
    }
}

/// Alert severity tier, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use hermia_common::types::Severity;
///
/// let sev: Severity = "medium".parse().unwrap();
/// assert_eq!(sev, Severity::Medium);
/// assert_eq!(sev.to_string(), "medium");
/// assert!(Severity::High > Severity::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Lifecycle tag recorded with every alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Registered,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Registered => write!(f, "registered"),
        }
    }
}

/// One rule that contributed to an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredRule {
    pub channel: Channel,
    /// Human-readable clause, e.g. `vibration >= 0.8 (value=1.3, 3/5, high)`
    pub description: String,
    /// Current reading's value on this channel
    pub value: f64,
    /// Breaching readings in the window
    pub breaches: usize,
    /// Configured window size the count is reported against
    pub window_size: usize,
    pub severity: Severity,
}

/// The single alert produced by an evaluation cycle. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Timestamp of the reading that closed the window
    pub timestamp: DateTime<Utc>,
    /// Maximum severity across contributing rules
    pub severity: Severity,
    /// Composite description, clauses joined in fixed channel order
    pub description: String,
    /// Contributing rules in fixed channel order
    pub triggers: Vec<TriggeredRule>,
    /// Representative value for logging (first non-missing channel in priority order)
    pub value: Option<f64>,
    /// Channel the representative value was taken from
    pub value_channel: Option<Channel>,
    pub status: AlertStatus,
}
