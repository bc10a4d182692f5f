use hermia_common::types::Reading;

/// Arrival-ordered sequence of readings.
///
/// Only the single ingestion path appends. The store keeps at least the
/// `capacity` most recent readings and compacts older ones in bulk, so
/// [`ReadingStore::recent`] is always a borrowed contiguous slice.
pub struct ReadingStore {
    readings: Vec<Reading>,
    capacity: usize,
}

impl ReadingStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn append(&mut self, reading: Reading) {
        if let Some(last) = self.readings.last() {
            if reading.timestamp < last.timestamp {
                tracing::warn!(
                    previous = %last.timestamp,
                    timestamp = %reading.timestamp,
                    "Reading arrived out of order, keeping arrival order"
                );
            }
        }
        self.readings.push(reading);

        if self.readings.len() >= self.capacity * 2 {
            let excess = self.readings.len() - self.capacity;
            self.readings.drain(..excess);
        }
    }

    /// The last `n` readings (fewer when the store holds fewer), oldest first.
    pub fn recent(&self, n: usize) -> &[Reading] {
        let start = self.readings.len().saturating_sub(n);
        &self.readings[start..]
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
