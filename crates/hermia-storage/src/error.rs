/// Errors raised while recording evidence.
///
/// An append failure is recoverable: callers report it without undoing the
/// alert decision it was meant to record.
///
/// # Examples
///
/// ```rust
/// use hermia_storage::error::StorageError;
///
/// let err = StorageError::InvalidLog {
///     path: "alerts.csv".to_string(),
///     reason: "unexpected header".to_string(),
/// };
/// assert!(err.to_string().contains("alerts.csv"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The log file or its parent directory could not be created or written.
    #[error("Storage: I/O error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// An existing log file does not start with the expected header.
    #[error("Storage: '{path}' is not an evidence log: {reason}")]
    InvalidLog { path: String, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
