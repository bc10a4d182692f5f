//! Alert evaluation engine for multi-channel sensor readings.
//!
//! Each cycle the [`engine::AlertEngine`] looks at the last `window_size`
//! readings, counts per-rule breaches with hysteresis applied, grades every
//! rule that meets the persistence quorum against the current reading, and
//! arbitrates the graded rules into at most one [`AlertEvent`].

pub mod arbitration;
pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod severity;
pub mod store;
pub mod window;


use hermia_common::types::AlertEvent;

/// Result of one evaluation cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No rule both met quorum and graded on the current reading.
    Healthy,
    Alert(AlertEvent),
}

impl Outcome {
    pub fn is_alert(&self) -> bool {
        matches!(self, Outcome::Alert(_))
    }

    pub fn alert(&self) -> Option<&AlertEvent> {
        match self {
            Outcome::Alert(event) => Some(event),
            Outcome::Healthy => None,
        }
    }
}
