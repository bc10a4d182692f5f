use hermia_common::types::Channel;

/// Configuration errors, raised once when an [`crate::engine::AlertEngine`]
/// is built and never during an evaluation cycle.
///
/// # Examples
///
/// ```rust
/// use hermia_alert::error::ConfigError;
///
/// let err = ConfigError::InvalidQuorum { quorum: 6, window_size: 5 };
/// assert!(err.to_string().contains("quorum"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Config: window_size must be at least 1")]
    EmptyWindow,

    #[error("Config: quorum {quorum} must satisfy 1 <= quorum <= window_size ({window_size})")]
    InvalidQuorum { quorum: usize, window_size: usize },

    #[error("Config: store_capacity {capacity} is smaller than window_size {window_size}")]
    StoreTooSmall { capacity: usize, window_size: usize },

    #[error("Config: hysteresis for {channel} must be finite and non-negative (got {value})")]
    InvalidHysteresis { channel: Channel, value: f64 },

    #[error("Config: {channel} rule has a non-finite threshold")]
    NonFiniteThreshold { channel: Channel },

    #[error("Config: {channel} range rule has low {low} greater than high {high}")]
    InvertedRange { channel: Channel, low: f64, high: f64 },

    #[error("Config: {channel} severity cuts must be finite, non-negative and medium <= high (got medium={medium}, high={high})")]
    InvalidCuts {
        channel: Channel,
        medium: f64,
        high: f64,
    },

    #[error("Config: more than one rule configured for {0}")]
    DuplicateRule(Channel),
}

/// Convenience `Result` alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
