//! Record Sinks
//!
//! Append-only destinations for raw samples, closed segments and feature
//! records, one stream per [`Destination`].

mod file;
mod memory;
mod record;

pub use file::{JsonLinesSink, SinkConfig};
pub use memory::MemorySink;
pub use record::{Destination, Record};

use thiserror::Error;

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        SinkError::Serialization(e.to_string())
    }
}

/// Append-only record destination
pub trait Sink {
    /// Queue one record for `destination`.
    ///
    /// A record that serialized is kept queued even when the call fails on a
    /// write; the next write or [`Sink::flush`] retries it.
    fn append(&mut self, destination: Destination, record: &Record) -> Result<(), SinkError>;

    /// Write out everything queued so far
    fn flush(&mut self) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn append(&mut self, destination: Destination, record: &Record) -> Result<(), SinkError> {
        (**self).append(destination, record)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}
