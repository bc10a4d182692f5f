use crate::config::MonitorConfig;
use anyhow::Context;
use hermia_alert::engine::AlertEngine;
use hermia_alert::error::ConfigError;
use hermia_alert::store::ReadingStore;
use hermia_alert::Outcome;
use hermia_common::types::Reading;
use hermia_storage::csv_log::CsvEvidenceLog;
use hermia_storage::error::StorageError;
use hermia_storage::{EvidenceLog, EvidenceRecord};

/// What one evaluation cycle produced.
///
/// A failed evidence append is reported next to the outcome; the alert
/// itself stands.
#[derive(Debug)]
pub struct CycleReport {
    pub outcome: Outcome,
    pub evidence_error: Option<StorageError>,
}

impl CycleReport {
    pub fn is_alert(&self) -> bool {
        self.outcome.is_alert()
    }

    /// True when an alert was raised and its evidence row written.
    pub fn recorded(&self) -> bool {
        self.outcome.is_alert() && self.evidence_error.is_none()
    }
}

/// Totals over a replayed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub readings: usize,
    pub alerts: usize,
    pub evidence_failures: usize,
}

/// Single-writer ingestion path: append, evaluate, record.
pub struct Monitor {
    engine: AlertEngine,
    store: ReadingStore,
    log: Box<dyn EvidenceLog>,
    device_id: String,
    delivery_channel: String,
}

impl Monitor {
    /// Builds the engine from `config` and records evidence into `log`.
    pub fn new(config: &MonitorConfig, log: Box<dyn EvidenceLog>) -> Result<Self, ConfigError> {
        let engine = AlertEngine::new(config.engine.clone())?;
        let store = engine.new_store();
        Ok(Self {
            engine,
            store,
            log,
            device_id: config.device_id.clone(),
            delivery_channel: config.delivery_channel.clone(),
        })
    }

    /// Builds a monitor writing to the CSV evidence log at `config.evidence_path`.
    pub fn from_config(config: &MonitorConfig) -> anyhow::Result<Self> {
        let log = CsvEvidenceLog::open(&config.evidence_path)
            .with_context(|| format!("failed to open evidence log {}", config.evidence_path))?;
        let monitor = Self::new(config, Box::new(log)).context("invalid engine configuration")?;
        Ok(monitor)
    }

    pub fn store(&self) -> &ReadingStore {
        &self.store
    }

    /// Runs one evaluation cycle for a newly arrived reading.
    pub fn ingest(&mut self, reading: Reading) -> CycleReport {
        self.store.append(reading);
        let outcome = self.engine.evaluate_store(&self.store);

        let evidence_error = match &outcome {
            Outcome::Healthy => None,
            Outcome::Alert(event) => {
                tracing::info!(
                    timestamp = %event.timestamp,
                    severity = %event.severity,
                    rules = event.triggers.len(),
                    description = %event.description,
                    "Alert raised"
                );
                let record =
                    EvidenceRecord::from_event(event, &self.device_id, &self.delivery_channel);
                match self.log.append(&record) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to record alert evidence");
                        Some(e)
                    }
                }
            }
        };

        CycleReport {
            outcome,
            evidence_error,
        }
    }

    /// Replays `readings` in order, one cycle each.
    pub fn run(&mut self, readings: impl IntoIterator<Item = Reading>) -> RunSummary {
        let mut summary = RunSummary::default();
        for reading in readings {
            let report = self.ingest(reading);
            summary.readings += 1;
            if report.is_alert() {
                summary.alerts += 1;
            }
            if report.evidence_error.is_some() {
                summary.evidence_failures += 1;
            }
        }
        summary
    }
}
