//! Sample Windows
//!
//! Owned, single-threaded sample stores used by the collectors:
//! - [`SlidingWindow`]: fixed capacity, evicts the oldest sample on overflow
//! - [`FlushBuffer`]: grows until explicitly drained

mod flush;
mod sliding;

pub use flush::FlushBuffer;
pub use sliding::SlidingWindow;
