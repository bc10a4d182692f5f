use hermia_alert::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Device identifier written to the evidence log
    #[serde(default = "default_device_id")]
    pub device_id: String,
    #[serde(default = "default_readings_path")]
    pub readings_path: String,
    #[serde(default = "default_evidence_path")]
    pub evidence_path: String,
    /// Delivery channel tag written to the evidence log
    #[serde(default = "default_delivery_channel")]
    pub delivery_channel: String,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            device_id: default_device_id(),
            readings_path: default_readings_path(),
            evidence_path: default_evidence_path(),
            delivery_channel: default_delivery_channel(),
            engine: EngineConfig::default(),
        }
    }
}

fn default_device_id() -> String {
    "esp32-01".to_string()
}

fn default_readings_path() -> String {
    "ingest/readings.csv".to_string()
}

fn default_evidence_path() -> String {
    "dashboard/alerts.csv".to_string()
}

fn default_delivery_channel() -> String {
    "whatsapp".to_string()
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::info!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
