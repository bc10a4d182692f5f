//! Reading sources for the hermia monitor.
//!
//! Each [`Collector`] produces [`Reading`]s for the ingestion path: the
//! [`csv_file::CsvCollector`] loads exported sensor logs and normalizes
//! their headers, the [`synthetic::SyntheticCollector`] fabricates demo
//! data. Neither is known to the alert engine.

pub mod csv_file;
pub mod synthetic;

use anyhow::Result;
use hermia_common::types::Reading;

/// A source of sensor readings.
pub trait Collector: Send + Sync {
    /// Collector name, used for logging.
    fn name(&self) -> &str;

    /// Returns the readings available from this source, ordered by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read.
    fn collect(&mut self) -> Result<Vec<Reading>>;
}
