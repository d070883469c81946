//! Temporal Features
//!
//! Aggregates over a window of raw per-tick (mouse) or per-transition
//! (keyboard) samples.

use crate::histogram::directional_key_histogram;
use crate::statistics::{ratio_or_zero, SampleStats};
use serde::{Deserialize, Serialize};
use telemetry_types::geometry::{angle_between, direction};
use telemetry_types::{DVec3, KeyboardTemporalSample, MouseTemporalSample};
use tracing::debug;

/// Temporal extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Samples at or below this angular speed count as fixating
    pub fixation_speed_threshold: f64,
    /// Shortest fixation run that is counted (seconds)
    pub fixation_min_duration: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            fixation_speed_threshold: 5.0,
            fixation_min_duration: 0.1,
        }
    }
}

/// Fixation summary of a window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fixations {
    pub total_time: f64,
    pub count: u32,
}

/// Temporal descriptors of a mouse window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseTemporalFeatures {
    pub start_time: f64,
    pub end_time: f64,
    pub sample_count: usize,
    pub angular_speed_mean: f64,
    pub angular_speed_std_dev: f64,
    pub angle_std_dev: f64,
    pub yaw_range: f64,
    pub pitch_range: f64,
    pub fixation_time: f64,
    pub fixation_count: u32,
    /// Clicking samples per second
    pub click_density: f64,
    /// Largest angle (degrees) between a gaze direction and the mean direction
    pub gaze_dispersion: f64,
}

/// Temporal descriptors of a keyboard window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardTemporalFeatures {
    pub start_time: f64,
    pub end_time: f64,
    pub sample_count: usize,
    pub mean_hold_time: f64,
    pub std_dev_hold_time: f64,
    pub mean_seek_time: f64,
    pub mean_latency2: f64,
    pub mean_latency3: f64,
    /// Transitions per second
    pub press_density: f64,
    /// W, A, S, D, Up, Down, Left, Right
    pub directional_key_bins: Vec<f64>,
}

/// Computes temporal features for both modalities
#[derive(Debug, Clone, Default)]
pub struct TemporalExtractor {
    config: TemporalConfig,
}

impl TemporalExtractor {
    pub fn new(config: TemporalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemporalConfig {
        &self.config
    }

    pub fn extract_mouse(&self, samples: &[MouseTemporalSample]) -> MouseTemporalFeatures {
        let speed: SampleStats = samples.iter().map(|s| s.angular_speed).collect();
        let angle: SampleStats = samples.iter().map(|s| s.angle).collect();
        let yaw: SampleStats = samples.iter().map(|s| s.yaw).collect();
        let pitch: SampleStats = samples.iter().map(|s| s.pitch).collect();
        let fixations = self.find_fixations(samples);

        let duration = window_duration(
            samples.first().map(|s| s.timestamp),
            samples.last().map(|s| s.timestamp),
        );
        let clicks = samples.iter().filter(|s| s.clicked()).count();

        debug!("Mouse temporal features over {} samples", samples.len());

        MouseTemporalFeatures {
            start_time: samples.first().map_or(0.0, |s| s.timestamp),
            end_time: samples.last().map_or(0.0, |s| s.timestamp),
            sample_count: samples.len(),
            angular_speed_mean: speed.mean,
            angular_speed_std_dev: speed.std_dev,
            angle_std_dev: angle.std_dev,
            yaw_range: yaw.range(),
            pitch_range: pitch.range(),
            fixation_time: fixations.total_time,
            fixation_count: fixations.count,
            click_density: ratio_or_zero(clicks as f64, duration),
            gaze_dispersion: gaze_dispersion(samples.iter().map(|s| s.position)),
        }
    }

    pub fn extract_keyboard(&self, samples: &[KeyboardTemporalSample]) -> KeyboardTemporalFeatures {
        let hold = positive_stats(samples.iter().map(|s| s.hold_time));
        let seek = positive_stats(samples.iter().map(|s| s.seek_time));
        let latency2 = positive_stats(samples.iter().map(|s| s.key_latency2));
        let latency3 = positive_stats(samples.iter().map(|s| s.key_latency3));

        let duration = window_duration(
            samples.first().map(|s| s.timestamp),
            samples.last().map(|s| s.timestamp),
        );

        debug!("Keyboard temporal features over {} samples", samples.len());

        KeyboardTemporalFeatures {
            start_time: samples.first().map_or(0.0, |s| s.timestamp),
            end_time: samples.last().map_or(0.0, |s| s.timestamp),
            sample_count: samples.len(),
            mean_hold_time: hold.mean,
            std_dev_hold_time: hold.std_dev,
            mean_seek_time: seek.mean,
            mean_latency2: latency2.mean,
            mean_latency3: latency3.mean,
            press_density: ratio_or_zero(samples.len() as f64, duration),
            directional_key_bins: directional_key_histogram(samples.iter().map(|s| s.key)),
        }
    }

    /// Runs of samples at or below the fixation threshold.
    ///
    /// A run lasts from its first to its last fixating sample and counts when
    /// it reaches the minimum duration. A run still open at the end of the
    /// window counts too.
    pub fn find_fixations(&self, samples: &[MouseTemporalSample]) -> Fixations {
        let mut result = Fixations::default();
        let mut run: Option<(f64, f64)> = None;

        for sample in samples {
            if sample.angular_speed <= self.config.fixation_speed_threshold {
                run = Some(match run {
                    Some((start, _)) => (start, sample.timestamp),
                    None => (sample.timestamp, sample.timestamp),
                });
            } else if let Some((start, end)) = run.take() {
                self.close_run(&mut result, end - start);
            }
        }
        if let Some((start, end)) = run {
            self.close_run(&mut result, end - start);
        }

        result
    }

    fn close_run(&self, result: &mut Fixations, duration: f64) {
        if duration >= self.config.fixation_min_duration {
            result.total_time += duration;
            result.count += 1;
        }
    }
}

/// Span between first and last sample; 0 when fewer than two
fn window_duration(first: Option<f64>, last: Option<f64>) -> f64 {
    match (first, last) {
        (Some(a), Some(b)) => b - a,
        _ => 0.0,
    }
}

/// Statistics over strictly positive values only
fn positive_stats<I: Iterator<Item = f64>>(values: I) -> SampleStats {
    values.filter(|&v| v > 0.0).collect()
}

/// Largest angle in degrees between any gaze direction and their mean.
/// Zero-length points are ignored.
pub fn gaze_dispersion<I: IntoIterator<Item = DVec3>>(points: I) -> f64 {
    let directions: Vec<DVec3> = points.into_iter().filter_map(direction).collect();
    let Some(mean) = direction(directions.iter().copied().sum()) else {
        return 0.0;
    };
    directions
        .iter()
        .map(|&d| angle_between(mean, d).to_degrees())
        .fold(0.0, f64::max)
}
