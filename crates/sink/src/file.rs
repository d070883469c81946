//! Batched JSON-lines file sink

use crate::record::{Destination, Record};
use crate::{Sink, SinkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// File sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Directory the stream files are created in
    pub directory: PathBuf,
    /// Queued records per destination that trigger a write
    pub max_batch: usize,
    /// Oldest queued record age that triggers a write (seconds)
    pub flush_interval_secs: f64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("telemetry"),
            max_batch: 20,
            flush_interval_secs: 2.0,
        }
    }
}

#[derive(Debug)]
struct Batch {
    lines: Vec<String>,
    opened_at: Instant,
}

/// Appends one JSON object per line to `<directory>/<destination file>`.
///
/// Records are queued per destination and written when the batch is full,
/// when it is older than the flush interval, or on [`Sink::flush`]. Queued
/// records are written on drop as well. A failed write keeps the unwritten
/// lines queued for the next attempt.
#[derive(Debug)]
pub struct JsonLinesSink {
    config: SinkConfig,
    batches: BTreeMap<Destination, Batch>,
    lines_written: u64,
}

impl JsonLinesSink {
    /// Create the output directory and an empty sink
    pub fn create(config: SinkConfig) -> Result<Self, SinkError> {
        fs::create_dir_all(&config.directory)?;
        info!("JSON-lines sink writing to {}", config.directory.display());
        Ok(Self {
            config,
            batches: BTreeMap::new(),
            lines_written: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Path of the file backing `destination`
    pub fn path_for(&self, destination: Destination) -> PathBuf {
        self.config.directory.join(destination.file_name())
    }

    /// Records queued and not yet written
    pub fn pending(&self) -> usize {
        self.batches.values().map(|b| b.lines.len()).sum()
    }

    /// Lines written to disk so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn flush_interval(&self) -> Duration {
        let secs = self.config.flush_interval_secs;
        if secs.is_finite() {
            Duration::from_secs_f64(secs.max(0.0))
        } else {
            Duration::MAX
        }
    }

    /// Write the queued lines of `destination`; lines stay queued until written
    fn write_batch(&mut self, destination: Destination) -> Result<(), SinkError> {
        let path = self.path_for(destination);
        let Some(batch) = self.batches.get_mut(&destination) else {
            return Ok(());
        };

        let mut written = 0;
        let result = append_lines(&path, &batch.lines, &mut written);
        batch.lines.drain(..written);
        if batch.lines.is_empty() {
            self.batches.remove(&destination);
        }

        if written > 0 {
            let count = written as u64;
            self.lines_written += count;
            metrics::counter!("sink_lines_written").increment(count);
            debug!("Wrote {} lines to {}", count, path.display());
        }
        if let Err(e) = &result {
            warn!(
                "Write to {} failed, {} lines still queued: {}",
                path.display(),
                self.pending_for(destination),
                e
            );
        }
        result.map_err(SinkError::from)
    }

    fn pending_for(&self, destination: Destination) -> usize {
        self.batches.get(&destination).map_or(0, |b| b.lines.len())
    }
}

/// Append newline-terminated lines, counting each one fully written
fn append_lines(path: &Path, lines: &[String], written: &mut usize) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in lines {
        file.write_all(line.as_bytes())?;
        *written += 1;
    }
    Ok(())
}

impl Sink for JsonLinesSink {
    fn append(&mut self, destination: Destination, record: &Record) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let max_batch = self.config.max_batch.max(1);
        let interval = self.flush_interval();
        let batch = self.batches.entry(destination).or_insert_with(|| Batch {
            lines: Vec::new(),
            opened_at: Instant::now(),
        });
        batch.lines.push(line);

        if batch.lines.len() >= max_batch || batch.opened_at.elapsed() >= interval {
            self.write_batch(destination)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let destinations: Vec<Destination> = self.batches.keys().copied().collect();
        let mut result = Ok(());
        for destination in destinations {
            // later destinations are still attempted, the first error is reported
            result = result.and(self.write_batch(destination));
        }
        result
    }
}

impl Drop for JsonLinesSink {
    fn drop(&mut self) {
        if self.pending() == 0 {
            return;
        }
        if let Err(e) = self.flush() {
            warn!("Dropping sink with unwritten records: {}", e);
        }
    }
}
