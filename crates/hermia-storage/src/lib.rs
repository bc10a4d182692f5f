//! Append-only evidence log for raised alerts.
//!
//! Every alert the engine raises is recorded as one [`EvidenceRecord`]. The
//! default implementation ([`csv_log::CsvEvidenceLog`]) appends rows to a CSV
//! file, creating it with the fixed [`HEADER`] on first use. Past rows are
//! never rewritten.

pub mod csv_log;
pub mod error;

use chrono::{DateTime, Utc};
use error::Result;
use hermia_common::types::{AlertEvent, AlertStatus, Severity};

/// Column names of the evidence log, in order.
pub const HEADER: [&str; 7] = [
    "ts",
    "device_id",
    "rule",
    "value",
    "severity",
    "channel",
    "status",
];

/// Timestamp layout used in the `ts` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the evidence log.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use hermia_common::types::{AlertEvent, AlertStatus, Channel, Severity};
/// use hermia_storage::EvidenceRecord;
///
/// let event = AlertEvent {
///     timestamp: Utc::now(),
///     severity: Severity::High,
///     description: "vibration >= 0.8 (value=1.23456, 3/5, high)".into(),
///     triggers: Vec::new(),
///     value: Some(1.23456),
///     value_channel: Some(Channel::Vibration),
///     status: AlertStatus::Registered,
/// };
/// let record = EvidenceRecord::from_event(&event, "esp32-01", "whatsapp");
/// assert_eq!(record.value, 1.235);
/// assert_eq!(record.fields()[4], "high");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceRecord {
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    /// Composite rule description
    pub rule: String,
    /// Representative value rounded to 3 decimals, 0 when absent
    pub value: f64,
    pub severity: Severity,
    /// Delivery channel tag (e.g. `whatsapp`)
    pub channel: String,
    pub status: AlertStatus,
}

impl EvidenceRecord {
    pub fn from_event(event: &AlertEvent, device_id: &str, delivery_channel: &str) -> Self {
        Self {
            timestamp: event.timestamp,
            device_id: device_id.to_string(),
            rule: event.description.clone(),
            value: round3(event.value.unwrap_or(0.0)),
            severity: event.severity,
            channel: delivery_channel.to_string(),
            status: event.status,
        }
    }

    /// Column values in [`HEADER`] order.
    pub fn fields(&self) -> [String; 7] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.device_id.clone(),
            self.rule.clone(),
            self.value.to_string(),
            self.severity.to_string(),
            self.channel.clone(),
            self.status.to_string(),
        ]
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Append-only sink for evidence records.
///
/// `append` is a single scoped write: it either records the row or returns
/// an error, and never retries internally.
pub trait EvidenceLog: Send + Sync {
    fn append(&self, record: &EvidenceRecord) -> Result<()>;
}
