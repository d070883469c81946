//! Drop-oldest sample window

use std::collections::VecDeque;

/// Fixed-capacity window of the most recent samples
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    /// Samples, oldest at the front
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    /// Create a window holding at most `capacity` samples (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a sample; returns the evicted oldest sample if the window overflowed
    pub fn push(&mut self, item: T) -> Option<T> {
        self.data.push_back(item);
        if self.data.len() > self.capacity {
            self.data.pop_front()
        } else {
            None
        }
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the window holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Samples in insertion order as one contiguous slice
    pub fn as_slice(&mut self) -> &[T] {
        self.data.make_contiguous()
    }

    /// The newest `count` samples, oldest first
    pub fn latest(&mut self, count: usize) -> &[T] {
        let slice = self.data.make_contiguous();
        let start = slice.len().saturating_sub(count);
        &slice[start..]
    }

    /// Remove every sample, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.data.drain(..)
    }
}
