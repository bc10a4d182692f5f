use chrono::{DateTime, Duration, TimeZone, Utc};
use hermia_alert::config::EngineConfig;
use hermia_alert::error::ConfigError;
use hermia_alert::Outcome;
use hermia_common::types::{Channel, Reading, Severity};
use hermia_monitor::config::MonitorConfig;
use hermia_monitor::pipeline::{Monitor, RunSummary};
use hermia_storage::csv_log::CsvEvidenceLog;
use hermia_storage::error::StorageError;
use hermia_storage::{EvidenceLog, EvidenceRecord, HEADER};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn t(i: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(i)
}

fn healthy(i: i64) -> Reading {
    Reading::new(t(i))
        .with(Channel::Vibration, 0.2)
        .with(Channel::AirQuality, 80.0)
        .with(Channel::Luminosity, 500.0)
        .with(Channel::Temperature, 25.0)
}

fn spike(i: i64) -> Reading {
    healthy(i).with(Channel::Vibration, 1.3)
}

/// In-memory log that records every appended row.
#[derive(Clone, Default)]
struct MemoryLog {
    records: Arc<Mutex<Vec<EvidenceRecord>>>,
}

impl EvidenceLog for MemoryLog {
    fn append(&self, record: &EvidenceRecord) -> hermia_storage::error::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

struct FailingLog;

impl EvidenceLog for FailingLog {
    fn append(&self, _record: &EvidenceRecord) -> hermia_storage::error::Result<()> {
        Err(StorageError::Io {
            path: "alerts.csv".to_string(),
            source: std::io::Error::other("disk full"),
        })
    }
}

fn memory_monitor() -> (Monitor, MemoryLog) {
    let log = MemoryLog::default();
    let monitor = Monitor::new(&MonitorConfig::default(), Box::new(log.clone())).unwrap();
    (monitor, log)
}

#[test]
fn healthy_stream_reports_healthy_every_cycle() {
    let (mut monitor, log) = memory_monitor();
    for i in 0..10 {
        let report = monitor.ingest(healthy(i));
        assert_eq!(report.outcome, Outcome::Healthy);
        assert!(!report.recorded());
    }
    assert!(log.records.lock().unwrap().is_empty());
    assert_eq!(monitor.store().len(), 10);
}

#[test]
fn transient_spike_is_not_recorded() {
    let (mut monitor, log) = memory_monitor();
    let summary = monitor.run(vec![healthy(0), healthy(1), spike(2), healthy(3), healthy(4)]);
    assert_eq!(
        summary,
        RunSummary {
            readings: 5,
            alerts: 0,
            evidence_failures: 0
        }
    );
    assert!(log.records.lock().unwrap().is_empty());
}

#[test]
fn sustained_breach_records_one_row_per_alerting_cycle() {
    let (mut monitor, log) = memory_monitor();
    monitor.ingest(healthy(0));
    monitor.ingest(healthy(1));
    assert!(!monitor.ingest(spike(2)).is_alert());
    assert!(!monitor.ingest(spike(3)).is_alert());
    let report = monitor.ingest(spike(4));
    assert!(report.recorded());

    let event = report.outcome.alert().unwrap();
    assert_eq!(event.severity, Severity::High);
    assert!(event.description.contains("3/5"));

    let records = log.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].device_id, "esp32-01");
    assert_eq!(records[0].channel, "whatsapp");
    assert_eq!(records[0].value, 1.3);
    assert_eq!(records[0].timestamp, t(4));
}

#[test]
fn recovered_reading_stops_recording() {
    let (mut monitor, log) = memory_monitor();
    let summary = monitor.run(vec![healthy(0), spike(1), spike(2), spike(3), healthy(4)]);
    assert_eq!(summary.alerts, 1);
    assert_eq!(log.records.lock().unwrap().len(), 1);
    assert_eq!(log.records.lock().unwrap()[0].timestamp, t(3));
}

#[test]
fn failed_evidence_append_keeps_the_alert() {
    let mut monitor = Monitor::new(&MonitorConfig::default(), Box::new(FailingLog)).unwrap();
    let reports: Vec<_> = (0..5).map(|i| monitor.ingest(spike(i))).collect();

    let last = reports.last().unwrap();
    assert!(last.is_alert());
    assert!(!last.recorded());
    assert!(matches!(last.evidence_error, Some(StorageError::Io { .. })));
    assert_eq!(last.outcome.alert().unwrap().severity, Severity::High);
}

#[test]
fn failed_appends_are_counted_in_summary() {
    let mut monitor = Monitor::new(&MonitorConfig::default(), Box::new(FailingLog)).unwrap();
    let summary = monitor.run((0..5).map(spike));
    assert_eq!(summary.alerts, 3);
    assert_eq!(summary.evidence_failures, 3);
}

#[test]
fn multi_rule_alert_lands_in_csv_log() {
    let dir = TempDir::new().unwrap();
    let config = MonitorConfig {
        evidence_path: dir
            .path()
            .join("dashboard")
            .join("alerts.csv")
            .display()
            .to_string(),
        ..MonitorConfig::default()
    };
    let mut monitor = Monitor::from_config(&config).unwrap();
    let breach = |i| {
        healthy(i)
            .with(Channel::Vibration, 1.0)
            .with(Channel::AirQuality, 40.0)
    };
    monitor.run(vec![healthy(0), healthy(1), breach(2), breach(3), breach(4)]);

    let content = std::fs::read_to_string(&config.evidence_path).unwrap();
    assert!(content.starts_with(&HEADER.join(",")));

    let rows = CsvEvidenceLog::open(&config.evidence_path)
        .unwrap()
        .rows()
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row[0], "2024-05-01 08:04:00");
    assert_eq!(row[1], "esp32-01");
    assert_eq!(
        row[2],
        "vibration >= 0.8 (value=1, 3/5, medium) | air_quality <= 60 (value=40, 3/5, high)"
    );
    assert_eq!(row[3], "1");
    assert_eq!(row[4], "high");
    assert_eq!(row[5], "whatsapp");
    assert_eq!(row[6], "registered");
}

#[test]
fn invalid_engine_config_fails_before_any_cycle() {
    let config = MonitorConfig {
        engine: EngineConfig {
            window_size: 5,
            quorum: 7,
            ..EngineConfig::default()
        },
        ..MonitorConfig::default()
    };
    let err = Monitor::new(&config, Box::new(MemoryLog::default())).err().unwrap();
    assert_eq!(
        err,
        ConfigError::InvalidQuorum {
            quorum: 7,
            window_size: 5
        }
    );
}

#[test]
fn toml_config_round_trip_through_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monitor.toml");
    std::fs::write(
        &path,
        r#"
device_id = "esp32-07"
delivery_channel = "email"

[engine]
window_size = 3
quorum = 2

[[engine.rules]]
channel = "temperature"
comparison = { kind = "range", low = 10.0, high = 20.0 }
cuts = { medium = 3.0, high = 6.0 }
"#,
    )
    .unwrap();

    let config = MonitorConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.device_id, "esp32-07");
    assert_eq!(config.evidence_path, "dashboard/alerts.csv");
    assert_eq!(config.engine.rules.len(), 1);

    let log = MemoryLog::default();
    let mut monitor = Monitor::new(&config, Box::new(log.clone())).unwrap();
    let hot = |i| Reading::new(t(i)).with(Channel::Temperature, 30.0);
    let summary = monitor.run(vec![hot(0), hot(1)]);
    assert_eq!(summary.alerts, 1);

    let records = log.records.lock().unwrap();
    assert_eq!(records[0].channel, "email");
    assert_eq!(records[0].device_id, "esp32-07");
    assert_eq!(records[0].severity, Severity::High);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let config = MonitorConfig::load_or_default(path.to_str().unwrap()).unwrap();
    assert_eq!(config.engine.window_size, 5);
    assert_eq!(config.device_id, "esp32-01");
}
