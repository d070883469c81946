//! In-memory sink

use crate::record::{Destination, Record};
use crate::{Sink, SinkError};
use std::collections::BTreeMap;

/// Keeps every appended record, grouped by destination
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: BTreeMap<Destination, Vec<Record>>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended to `destination`, oldest first
    pub fn records(&self, destination: Destination) -> &[Record] {
        self.records
            .get(&destination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, destination: Destination) -> usize {
        self.records(destination).len()
    }

    /// Records across all destinations
    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Number of `flush` calls seen
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Remove and return the records of one destination
    pub fn take(&mut self, destination: Destination) -> Vec<Record> {
        self.records.remove(&destination).unwrap_or_default()
    }
}

impl Sink for MemorySink {
    fn append(&mut self, destination: Destination, record: &Record) -> Result<(), SinkError> {
        self.records
            .entry(destination)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemetry_types::KeyboardSpatialSample;

    #[test]
    fn test_records_grouped_in_order() {
        let mut sink = MemorySink::new();
        for t in [0.0, 1.0, 2.0] {
            let record = Record::from(KeyboardSpatialSample {
                timestamp: t,
                ..Default::default()
            });
            sink.append(Destination::KeyboardSpatialData, &record).unwrap();
        }

        assert_eq!(sink.count(Destination::KeyboardSpatialData), 3);
        assert_eq!(sink.count(Destination::MouseSpatialData), 0);
        assert_eq!(sink.total(), 3);

        let taken = sink.take(Destination::KeyboardSpatialData);
        assert!(matches!(&taken[2], Record::KeyboardSpatial(s) if s.timestamp == 2.0));
        assert_eq!(sink.total(), 0);
    }
}
