use crate::Collector;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use hermia_common::csv;
use hermia_common::types::{Channel, Reading};
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical column a CSV header maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    Channel(Channel),
}

/// Recognized header aliases (compared case-insensitively), English and
/// Portuguese spellings included.
pub const HEADER_ALIASES: &[(&str, Column)] = &[
    ("ts", Column::Timestamp),
    ("timestamp", Column::Timestamp),
    ("datahora", Column::Timestamp),
    ("temperature", Column::Channel(Channel::Temperature)),
    ("temperatura", Column::Channel(Channel::Temperature)),
    ("temp", Column::Channel(Channel::Temperature)),
    ("vibration", Column::Channel(Channel::Vibration)),
    ("vibracao", Column::Channel(Channel::Vibration)),
    ("luminosity", Column::Channel(Channel::Luminosity)),
    ("luminosidade", Column::Channel(Channel::Luminosity)),
    ("air_q", Column::Channel(Channel::AirQuality)),
    ("air_quality", Column::Channel(Channel::AirQuality)),
    ("qualidade_ar", Column::Channel(Channel::AirQuality)),
    ("qualidadear", Column::Channel(Channel::AirQuality)),
    ("qualidade_de_ar", Column::Channel(Channel::AirQuality)),
];

/// Maps a raw header to its canonical column, `None` for unknown columns.
pub fn canonical_column(header: &str) -> Option<Column> {
    let header = header.trim().to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, column)| *column)
}

/// Parses RFC 3339, `%Y-%m-%d %H:%M:%S` (optionally with `T` and fractional
/// seconds, read as UTC) or integer epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parses CSV text into readings sorted by timestamp. Rows whose timestamp
/// cannot be parsed are skipped.
pub fn parse_readings(text: &str) -> Result<Vec<Reading>> {
    let mut rows = csv::parse(text).into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<Option<Column>> = header.iter().map(|h| canonical_column(h)).collect();
    let Some(ts_index) = columns.iter().position(|c| *c == Some(Column::Timestamp)) else {
        bail!("no timestamp column in header: {}", header.join(","));
    };

    let mut readings = Vec::new();
    for (line, row) in rows.enumerate() {
        let raw_ts = row.get(ts_index).map(String::as_str).unwrap_or("");
        let Some(timestamp) = parse_timestamp(raw_ts) else {
            tracing::warn!(row = line + 2, timestamp = raw_ts, "Skipping row with invalid timestamp");
            continue;
        };
        let mut reading = Reading::new(timestamp);
        for (column, raw) in columns.iter().zip(&row) {
            if let Some(Column::Channel(channel)) = column {
                reading.set(*channel, parse_value(raw));
            }
        }
        readings.push(reading);
    }

    readings.sort_by_key(|r| r.timestamp);
    Ok(readings)
}

/// Writes readings with canonical headers, missing values left empty.
pub fn write_readings(path: &Path, readings: &[Reading]) -> Result<()> {
    let mut out = String::from("ts");
    for channel in Channel::ALL {
        out.push(',');
        out.push_str(channel.as_str());
    }
    out.push('\n');
    for reading in readings {
        let mut fields = vec![reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
        fields.extend(
            Channel::ALL
                .iter()
                .map(|&ch| reading.value(ch).map(|v| v.to_string()).unwrap_or_default()),
        );
        out.push_str(&csv::format_row(&fields));
        out.push('\n');
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

/// Loads readings from a CSV file.
pub struct CsvCollector {
    path: PathBuf,
}

impl CsvCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Collector for CsvCollector {
    fn name(&self) -> &str {
        "csv"
    }

    fn collect(&mut self) -> Result<Vec<Reading>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let readings = parse_readings(&text)
            .with_context(|| format!("invalid readings file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), count = readings.len(), "Readings loaded");
        Ok(readings)
    }
}
