//! Live-view collaborators

use std::collections::{BTreeMap, VecDeque};

/// Receives feature values and event markers as they are produced
pub trait LiveView {
    /// A new value for a named series
    fn notify(&mut self, series: &str, timestamp: f64, value: f64);

    /// A discrete event, e.g. a segment close
    fn mark(&mut self, _timestamp: f64, _event: &str) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl LiveView for NullView {
    fn notify(&mut self, _series: &str, _timestamp: f64, _value: f64) {}
}

/// Points kept per series, and event markers kept overall
pub const SERIES_CAPACITY: usize = 2000;

/// Keeps the latest points of every series and the latest event markers
#[derive(Debug, Clone)]
pub struct SeriesRecorder {
    capacity: usize,
    series: BTreeMap<String, VecDeque<(f64, f64)>>,
    events: VecDeque<(f64, String)>,
}

impl SeriesRecorder {
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: BTreeMap::new(),
            events: VecDeque::new(),
        }
    }

    /// Points of one series, oldest first
    pub fn series(&self, name: &str) -> Option<&VecDeque<(f64, f64)>> {
        self.series.get(name)
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Event markers, oldest first
    pub fn events(&self) -> &VecDeque<(f64, String)> {
        &self.events
    }
}

impl Default for SeriesRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveView for SeriesRecorder {
    fn notify(&mut self, series: &str, timestamp: f64, value: f64) {
        let points = self.series.entry(series.to_owned()).or_default();
        points.push_back((timestamp, value));
        if points.len() > self.capacity {
            points.pop_front();
        }
    }

    fn mark(&mut self, timestamp: f64, event: &str) {
        self.events.push_back((timestamp, event.to_owned()));
        if self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }
}

impl<V: LiveView + ?Sized> LiveView for &mut V {
    fn notify(&mut self, series: &str, timestamp: f64, value: f64) {
        (**self).notify(series, timestamp, value)
    }

    fn mark(&mut self, timestamp: f64, event: &str) {
        (**self).mark(timestamp, event)
    }
}
