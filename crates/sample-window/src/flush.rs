//! Unbounded buffer drained on demand

/// Accumulates samples until the owner flushes it
#[derive(Debug, Clone)]
pub struct FlushBuffer<T> {
    items: Vec<T>,
    /// Time of the first sample since the last flush
    opened_at: Option<f64>,
}

impl<T> FlushBuffer<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            opened_at: None,
        }
    }

    /// Append a sample observed at `timestamp`
    pub fn push(&mut self, timestamp: f64, item: T) {
        self.opened_at.get_or_insert(timestamp);
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Seconds since the first buffered sample, 0 when empty
    pub fn age(&self, now: f64) -> f64 {
        self.opened_at.map_or(0.0, |t| (now - t).max(0.0))
    }

    /// Take every buffered sample, oldest first, leaving the buffer empty
    pub fn take(&mut self) -> Vec<T> {
        self.opened_at = None;
        std::mem::take(&mut self.items)
    }
}

impl<T> Default for FlushBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
