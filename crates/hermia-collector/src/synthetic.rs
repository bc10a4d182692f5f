use crate::Collector;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use hermia_common::types::{Channel, Reading};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates demo readings around healthy baselines, one per interval,
/// ending at `end`. Optionally closes with a run of forced spike readings.
pub struct SyntheticCollector {
    count: usize,
    interval: Duration,
    end: DateTime<Utc>,
    spike_len: usize,
    rng: StdRng,
}

impl SyntheticCollector {
    pub fn new(count: usize, end: DateTime<Utc>) -> Self {
        Self {
            count,
            interval: Duration::minutes(1),
            end,
            spike_len: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixes the random sequence, for reproducible demo files.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Appends `len` consecutive readings with vibration >= 1.2 and air
    /// quality <= 40. A run at least as long as the engine quorum forces an
    /// alert on the last one.
    pub fn with_spike(mut self, len: usize) -> Self {
        self.spike_len = len;
        self
    }

    fn spike(&mut self, timestamp: DateTime<Utc>) -> Reading {
        let mut reading = self.healthy(timestamp);
        let vibration = reading.value(Channel::Vibration).unwrap_or(0.0).max(1.2);
        let air_quality = reading.value(Channel::AirQuality).unwrap_or(100.0).min(40.0);
        reading.set(Channel::Vibration, Some(vibration));
        reading.set(Channel::AirQuality, Some(air_quality));
        reading
    }

    fn healthy(&mut self, timestamp: DateTime<Utc>) -> Reading {
        let temperature = 30.0 + self.rng.gen_range(-1.0..=1.0) * 0.3;
        Reading::new(timestamp)
            .with(Channel::Temperature, round(temperature, 2))
            .with(Channel::Vibration, round(self.rng.gen_range(0.0..0.6), 3))
            .with(Channel::Luminosity, self.rng.gen_range(300..800) as f64)
            .with(Channel::AirQuality, self.rng.gen_range(70..100) as f64)
    }
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Collector for SyntheticCollector {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn collect(&mut self) -> Result<Vec<Reading>> {
        let total = self
            .count
            .checked_add(self.spike_len)
            .context("too many synthetic readings requested")?;
        if total == 0 {
            return Ok(Vec::new());
        }
        let span = i32::try_from(total - 1)
            .with_context(|| format!("cannot generate {total} synthetic readings"))?;

        let mut readings = Vec::with_capacity(total);
        for (i, steps_back) in (0..=span).rev().enumerate() {
            let timestamp = self
                .end
                .checked_sub_signed(self.interval * steps_back)
                .context("synthetic timestamps out of range")?;
            let reading = if i < self.count {
                self.healthy(timestamp)
            } else {
                self.spike(timestamp)
            };
            readings.push(reading);
        }

        tracing::debug!(
            count = readings.len(),
            spike_len = self.spike_len,
            "Synthetic readings generated"
        );
        Ok(readings)
    }
}
