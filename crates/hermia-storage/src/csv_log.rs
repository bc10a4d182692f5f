use crate::error::{Result, StorageError};
use crate::{EvidenceLog, EvidenceRecord, HEADER};
use hermia_common::csv;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// CSV-file evidence log. The file is opened per append and closed again.
pub struct CsvEvidenceLog {
    path: PathBuf,
}

impl CsvEvidenceLog {
    /// Opens the log at `path`. A missing file is fine; it is created on the
    /// first append. An existing non-empty file must carry [`HEADER`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.is_file() {
            let content = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
            if !content.trim().is_empty() {
                let first = csv::parse(&content).into_iter().next().unwrap_or_default();
                if first != HEADER {
                    return Err(StorageError::InvalidLog {
                        path: path.display().to_string(),
                        reason: format!("expected header '{}'", HEADER.join(",")),
                    });
                }
            }
        }
        Ok(Self { path })
    }

    /// All data rows currently in the log, header excluded.
    pub fn rows(&self) -> Result<Vec<Vec<String>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        Ok(csv::parse(&content).into_iter().skip(1).collect())
    }
}

impl EvidenceLog for CsvEvidenceLog {
    fn append(&self, record: &EvidenceRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::io(&self.path, e))?;
        let is_new = file
            .metadata()
            .map_err(|e| StorageError::io(&self.path, e))?
            .len()
            == 0;

        let mut buf = String::new();
        if is_new {
            buf.push_str(&csv::format_row(&HEADER));
            buf.push('\n');
        }
        buf.push_str(&csv::format_row(&record.fields()));
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| StorageError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            severity = %record.severity,
            created = is_new,
            "Evidence recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hermia_common::types::{AlertStatus, Severity};
    use tempfile::TempDir;

    fn record(rule: &str, value: f64) -> EvidenceRecord {
        EvidenceRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            device_id: "esp32-01".to_string(),
            rule: rule.to_string(),
            value,
            severity: Severity::High,
            channel: "whatsapp".to_string(),
            status: AlertStatus::Registered,
        }
    }

    #[test]
    fn first_append_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard").join("alerts.csv");
        let log = CsvEvidenceLog::open(&path).unwrap();

        log.append(&record("vibration >= 0.8 (value=1.3, 3/5, high)", 1.3))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("ts,device_id,rule,value,severity,channel,status")
        );
        assert_eq!(
            lines.next(),
            Some("2024-05-01 08:30:00,esp32-01,\"vibration >= 0.8 (value=1.3, 3/5, high)\",1.3,high,whatsapp,registered")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn appends_never_rewrite_previous_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.csv");
        let log = CsvEvidenceLog::open(&path).unwrap();
        log.append(&record("first", 1.0)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let reopened = CsvEvidenceLog::open(&path).unwrap();
        reopened.append(&record("second", 2.0)).unwrap();
        let after = fs::read_to_string(&path).unwrap();

        assert!(after.starts_with(&before));
        let rows = reopened.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], "first");
        assert_eq!(rows[1][2], "second");
        assert_eq!(after.matches("device_id").count(), 1);
    }

    #[test]
    fn rows_of_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = CsvEvidenceLog::open(dir.path().join("none.csv")).unwrap();
        assert!(log.rows().unwrap().is_empty());
    }

    #[test]
    fn foreign_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.csv");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        assert!(matches!(
            CsvEvidenceLog::open(&path),
            Err(StorageError::InvalidLog { .. })
        ));
    }

    #[test]
    fn unwritable_location_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let log = CsvEvidenceLog::open(blocker.join("alerts.csv")).unwrap();
        let err = log.append(&record("x", 0.0)).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
