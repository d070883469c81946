//! Input Replay Host
//!
//! Feeds a recorded stream of input events through the collector pipeline
//! and writes every sample and feature record to a JSON-lines session
//! directory. Ctrl-C stops reading and drains the pipeline like end of input.

mod settings;

pub use settings::{Settings, ENV_PREFIX};

use collector::{CollectorError, Pipeline};
use serde::{Deserialize, Serialize};
use sink::{JsonLinesSink, SinkConfig, SinkError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use telemetry_types::Tick;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay error types
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No input stream configured")]
    MissingInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed event on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Collector(#[from] CollectorError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// One line of a recorded stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Tick(Tick),
    /// Close the keyboard locomotion segment
    CloseSegment { timestamp: f64 },
    /// Extract and drain the keyboard temporal window
    FlushKeyboard { timestamp: f64 },
    /// Pause or resume collection
    Recording { enabled: bool },
}

/// Outcome of a replay run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub lines: usize,
    pub ticks: usize,
    /// Events refused by validation
    pub rejected: usize,
    pub features: usize,
    pub lines_written: u64,
    pub interrupted: bool,
    pub session_dir: PathBuf,
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Replay the configured input stream and drain the pipeline
pub async fn run(settings: Settings) -> Result<ReplaySummary, ReplayError> {
    let input = settings.input.clone().ok_or(ReplayError::MissingInput)?;
    let session_dir = settings.session_dir();

    let sink = JsonLinesSink::create(SinkConfig {
        directory: session_dir.clone(),
        ..settings.sink.clone()
    })?;
    let mut pipeline = Pipeline::headless(settings.collector.clone(), sink)?;

    info!("Replaying {} into {}", input.display(), session_dir.display());

    let mut summary = ReplaySummary {
        session_dir,
        ..Default::default()
    };

    // Every exit past this point drains the pipeline first
    let replayed = replay_events(&settings, &input, &mut pipeline, &mut summary).await;
    let sink = match (replayed, pipeline.shutdown()) {
        (Ok(()), Ok(sink)) => sink,
        (Ok(()), Err(e)) => return Err(e.into()),
        (Err(e), drained) => {
            if let Err(drain_err) = drained {
                warn!("Drain after failed replay also failed: {}", drain_err);
            }
            return Err(e);
        }
    };

    summary.lines_written = sink.lines_written();
    info!(
        "Replay finished: {} lines, {} ticks, {} feature records, {} lines written",
        summary.lines, summary.ticks, summary.features, summary.lines_written
    );
    Ok(summary)
}

async fn replay_events(
    settings: &Settings,
    input: &Path,
    pipeline: &mut Pipeline<JsonLinesSink>,
    summary: &mut ReplaySummary,
) -> Result<(), ReplayError> {
    let file = tokio::fs::File::open(input).await?;
    let mut lines = BufReader::new(file).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_tick: Option<f64> = None;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => {
                info!("Interrupted, draining pipeline");
                summary.interrupted = true;
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };
        summary.lines += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: ReplayEvent = serde_json::from_str(line).map_err(|e| ReplayError::Parse {
            line: summary.lines,
            message: e.to_string(),
        })?;

        let outcome = match event {
            ReplayEvent::Tick(tick) => {
                if let Some(wait) = pacing(settings.speed, last_tick, tick.timestamp) {
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = &mut shutdown => {
                            info!("Interrupted, draining pipeline");
                            summary.interrupted = true;
                            return Ok(());
                        }
                    }
                }
                last_tick = Some(tick.timestamp);

                pipeline.tick(&tick).map(|report| {
                    summary.ticks += 1;
                    summary.features += report.features.len();
                })
            }
            ReplayEvent::CloseSegment { timestamp } => {
                pipeline.close_segment(timestamp).map(|closed| {
                    summary.features += usize::from(closed.is_some());
                })
            }
            ReplayEvent::FlushKeyboard { timestamp } => {
                pipeline.flush_keyboard_window(timestamp).map(|flushed| {
                    summary.features += usize::from(flushed.is_some());
                })
            }
            ReplayEvent::Recording { enabled } => {
                pipeline.set_recording(enabled);
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {}
            Err(CollectorError::Input(e)) => {
                warn!("Skipping event on line {}: {}", summary.lines, e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Delay before a tick recorded at `timestamp`, scaled by replay speed
fn pacing(speed: f64, previous: Option<f64>, timestamp: f64) -> Option<Duration> {
    if !(speed > 0.0) {
        return None;
    }
    let wait = (timestamp - previous?) / speed;
    (wait.is_finite() && wait > 0.0).then(|| Duration::from_secs_f64(wait))
}
