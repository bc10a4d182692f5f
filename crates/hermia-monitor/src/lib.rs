//! The hermia monitor: feeds readings one at a time through the reading
//! store and alert engine, and records every raised alert in the evidence
//! log.

pub mod config;
pub mod pipeline;
