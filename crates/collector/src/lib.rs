//! Input Collector
//!
//! Tick-driven front end of the feature pipeline:
//! - Tick validation and raw sample ingestion
//! - Mouse: sliding temporal window, spherical segments closed on inactivity
//! - Keyboard: periodically flushed key window, locomotion segments closed on demand
//! - Feature records and drained samples handed to a [`Sink`]
//! - Optional live view of feature series

pub mod config;
pub mod ingest;
pub mod keyboard;
pub mod live;
pub mod mouse;

pub use config::{CollectorConfig, KeyboardConfig, MouseConfig};
pub use keyboard::KeyboardCollector;
pub use live::{LiveView, NullView, SeriesRecorder};
pub use mouse::MouseCollector;

use feature_engine::{FeatureRecord, KeyboardSpatialFeatures, KeyboardTemporalFeatures};
use sink::{Destination, Record, Sink, SinkError};
use telemetry_types::{InputError, Tick, TickValidator};
use thiserror::Error;
use tracing::{debug, info};

/// Collector error types
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Sink failure: {0}")]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What a single tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Spatial samples added to the open mouse segment
    pub mouse_samples: usize,
    /// Spatial samples added to the open keyboard segment
    pub keyboard_samples: usize,
    /// Feature records written during the tick, in write order
    pub features: Vec<FeatureRecord>,
}

/// Write a feature record and hand it back to the caller
pub(crate) fn publish<S: Sink>(
    sink: &mut S,
    destination: Destination,
    feature: FeatureRecord,
) -> Result<FeatureRecord, SinkError> {
    sink.append(destination, &Record::Feature(feature.clone()))?;
    metrics::counter!("feature_records").increment(1);
    debug!(
        "{:?} record over {} samples ending at t={}",
        destination,
        feature.sample_count(),
        feature.end_time()
    );
    Ok(feature)
}

/// Mouse and keyboard collection behind one tick entry point
pub struct Pipeline<S: Sink, V: LiveView = NullView> {
    validator: TickValidator,
    mouse: MouseCollector,
    keyboard: KeyboardCollector,
    sink: S,
    view: V,
    recording: bool,
    resume_pending: bool,
}

impl<S: Sink> Pipeline<S, NullView> {
    /// Pipeline without a live view
    pub fn headless(config: CollectorConfig, sink: S) -> Result<Self, CollectorError> {
        Self::new(config, sink, NullView)
    }
}

impl<S: Sink, V: LiveView> Pipeline<S, V> {
    pub fn new(config: CollectorConfig, sink: S, view: V) -> Result<Self, CollectorError> {
        config.validate()?;
        info!(
            "Starting collector: mouse window={} buffer={} timeout={}s, keyboard flush={}s",
            config.mouse.temporal_window,
            config.mouse.spatial_buffer_size,
            config.mouse.segment_timeout,
            config.keyboard.flush_interval
        );
        Ok(Self {
            validator: TickValidator::new(),
            mouse: MouseCollector::new(config.mouse),
            keyboard: KeyboardCollector::new(config.keyboard),
            sink,
            view,
            recording: true,
            resume_pending: false,
        })
    }

    /// Process one host tick.
    ///
    /// A rejected tick leaves every window, segment and resampler untouched.
    pub fn tick(&mut self, tick: &Tick) -> Result<TickReport, CollectorError> {
        self.validator.validate(tick)?;

        let mut report = TickReport::default();
        if !self.recording {
            return Ok(report);
        }
        if self.resume_pending {
            self.resume_pending = false;
            self.mouse.resume(tick.timestamp, &tick.mouse);
            self.keyboard.resume(tick.timestamp, &tick.keyboard);
        }

        // a sink failure on one modality still lets the other ingest the tick
        let mouse = self.mouse.ingest(
            tick.timestamp,
            &tick.mouse,
            &mut self.sink,
            &mut self.view,
            &mut report.features,
        );
        let keyboard = self.keyboard.ingest(
            tick.timestamp,
            &tick.keyboard,
            &mut self.sink,
            &mut self.view,
            &mut report.features,
        );
        report.mouse_samples = mouse?;
        report.keyboard_samples = keyboard?;
        Ok(report)
    }

    /// Close the open keyboard segment at `timestamp` and open the next one
    pub fn close_segment(
        &mut self,
        timestamp: f64,
    ) -> Result<Option<KeyboardSpatialFeatures>, CollectorError> {
        self.validator.validate_timestamp(timestamp)?;
        Ok(self
            .keyboard
            .close_segment(timestamp, &mut self.sink, &mut self.view)?)
    }

    /// Extract and drain the keyboard temporal window now
    pub fn flush_keyboard_window(
        &mut self,
        timestamp: f64,
    ) -> Result<Option<KeyboardTemporalFeatures>, CollectorError> {
        self.validator.validate_timestamp(timestamp)?;
        Ok(self.keyboard.flush_window(&mut self.sink)?)
    }

    /// Pause or resume ingestion; paused ticks are validated and then ignored
    pub fn set_recording(&mut self, recording: bool) {
        if recording && !self.recording {
            self.resume_pending = true;
        }
        if recording != self.recording {
            debug!("Recording {}", if recording { "resumed" } else { "paused" });
        }
        self.recording = recording;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn mouse_segment_id(&self) -> u32 {
        self.mouse.segment_id()
    }

    pub fn keyboard_segment_id(&self) -> u32 {
        self.keyboard.segment_id()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Drain every window and open segment, flush the sink and return it.
    ///
    /// Both modalities are drained and the sink flushed even when a write
    /// fails; the first failure is returned.
    pub fn shutdown(mut self) -> Result<S, CollectorError> {
        let timestamp = self.validator.last_timestamp().unwrap_or(0.0);
        let mut features = Vec::new();

        let mouse = self
            .mouse
            .finish(timestamp, &mut self.sink, &mut self.view, &mut features);
        let keyboard = self
            .keyboard
            .finish(timestamp, &mut self.sink, &mut self.view, &mut features);
        let flushed = self.sink.flush();
        mouse.and(keyboard).and(flushed)?;

        info!(
            "Collector shut down at t={}: {} final records, segments mouse={} keyboard={}",
            timestamp,
            features.len(),
            self.mouse.segment_id(),
            self.keyboard.segment_id()
        );
        Ok(self.sink)
    }
}

#[cfg(test)]
pub(crate) mod test_sinks {
    use sink::{Destination, MemorySink, Record, Sink, SinkError};

    /// Keeps every record but reports a failed write on one append
    pub struct FailingSink {
        pub inner: MemorySink,
        fail_on: usize,
        appends: usize,
    }

    impl FailingSink {
        pub fn failing_on(fail_on: usize) -> Self {
            Self {
                inner: MemorySink::new(),
                fail_on,
                appends: 0,
            }
        }
    }

    impl Sink for FailingSink {
        fn append(&mut self, destination: Destination, record: &Record) -> Result<(), SinkError> {
            self.inner.append(destination, record)?;
            self.appends += 1;
            if self.appends == self.fail_on {
                let e = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
                return Err(SinkError::Io(e));
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            self.inner.flush()
        }
    }
}
