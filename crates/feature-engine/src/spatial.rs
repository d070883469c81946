//! Spatial Features
//!
//! Path shape descriptors over resampled segments: path length, displacement,
//! efficiency, curvature, speed. Mouse windows live on the sampling sphere and
//! measure great-circle arcs; keyboard segments live in world space.

use crate::histogram::{turn_angle_histogram, turn_bin_count};
use crate::statistics::{ratio_or_zero, SampleStats};
use serde::{Deserialize, Serialize};
use telemetry_types::geometry::{angle_between, arc_length, turning_angle};
use telemetry_types::{DVec3, KeyboardSegment, KeyboardSpatialSample, MouseSpatialSample};
use tracing::debug;

/// Spatial extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Radius of the mouse sampling sphere
    pub radius: f64,
    /// Length of the trailing mouse window; arc ratios end below this index
    pub sampling_count: usize,
    /// Sample index the first arc ratio ends at
    pub arc_ratio_start: usize,
    /// Index step between arc ratios
    pub arc_ratio_stride: usize,
    /// Turn histogram bin width (degrees)
    pub turn_bin_degrees: f64,
    /// Lags pooled into the turn histogram
    pub turn_strides: Vec<usize>,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            sampling_count: 10,
            arc_ratio_start: 3,
            arc_ratio_stride: 2,
            turn_bin_degrees: 10.0,
            turn_strides: vec![1, 3, 5, 9],
        }
    }
}

impl SpatialConfig {
    /// Sample indices the arc ratios end at
    pub fn arc_ratio_indices(&self) -> Vec<usize> {
        (self.arc_ratio_start..self.sampling_count)
            .step_by(self.arc_ratio_stride.max(1))
            .collect()
    }
}

/// What triggered a mouse spatial extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Trailing sub-window of an open segment
    Trailing,
    /// Whole retained segment at close
    Segment,
}

/// Spatial descriptors of a mouse window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseSpatialFeatures {
    pub segment_id: u32,
    pub kind: WindowKind,
    pub start_time: f64,
    pub end_time: f64,
    pub sample_count: usize,
    /// Travelled arc over straight arc for growing prefixes of the window
    pub arc_ratios: Vec<f64>,
    pub total_arc_length: f64,
    pub displacement: f64,
    pub efficiency: f64,
    pub curvature_mean: f64,
    pub curvature_std_dev: f64,
    /// Radians per second
    pub angular_speed_mean: f64,
    pub angular_speed_std_dev: f64,
    /// Relative frequency of turning angles per bin
    pub turn_bins: Vec<f64>,
}

/// Spatial descriptors of a keyboard locomotion segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardSpatialFeatures {
    pub segment_id: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub sample_count: usize,
    /// Distance along the trajectory
    pub total_distance: f64,
    /// Distance between first and last sample
    pub displacement: f64,
    pub efficiency: f64,
    pub curvature_mean: f64,
    pub curvature_std_dev: f64,
    /// World units per second
    pub speed_mean: f64,
    pub speed_std_dev: f64,
}

/// Computes spatial features for both modalities
#[derive(Debug, Clone, Default)]
pub struct SpatialExtractor {
    config: SpatialConfig,
}

impl SpatialExtractor {
    pub fn new(config: SpatialConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Extract mouse features from a window of spherical samples
    pub fn extract_mouse(
        &self,
        samples: &[MouseSpatialSample],
        segment_id: u32,
        kind: WindowKind,
    ) -> MouseSpatialFeatures {
        let radius = self.config.radius;
        let directions: Vec<DVec3> = samples.iter().map(|s| s.direction).collect();

        let total_arc_length = spherical_path_length(&directions, radius);
        let displacement = match (directions.first(), directions.last()) {
            (Some(&a), Some(&b)) => arc_length(a, b, radius),
            _ => 0.0,
        };

        let arc_ratios = self
            .config
            .arc_ratio_indices()
            .into_iter()
            .map(|n| spherical_arc_ratio(&directions, n, radius))
            .collect();

        let curvature = spherical_curvature(&directions);
        let angular_speed = angular_speeds(samples);

        let turn_bins = if directions.len() < 2 {
            vec![0.0; turn_bin_count(self.config.turn_bin_degrees)]
        } else {
            turn_angle_histogram(
                &directions,
                self.config.turn_bin_degrees,
                &self.config.turn_strides,
            )
        };

        debug!(
            "Mouse spatial features: segment={} kind={:?} samples={}",
            segment_id,
            kind,
            samples.len()
        );

        MouseSpatialFeatures {
            segment_id,
            kind,
            start_time: samples.first().map_or(0.0, |s| s.timestamp),
            end_time: samples.last().map_or(0.0, |s| s.timestamp),
            sample_count: samples.len(),
            arc_ratios,
            total_arc_length,
            displacement,
            efficiency: efficiency(displacement, total_arc_length),
            curvature_mean: curvature.mean,
            curvature_std_dev: curvature.std_dev,
            angular_speed_mean: angular_speed.mean,
            angular_speed_std_dev: angular_speed.std_dev,
            turn_bins,
        }
    }

    /// Extract keyboard features from a closed locomotion segment
    pub fn extract_keyboard(&self, segment: &KeyboardSegment) -> KeyboardSpatialFeatures {
        let samples = &segment.samples;
        let positions: Vec<DVec3> = samples.iter().map(|s| s.position).collect();

        let total_distance = positions.windows(2).map(|w| w[0].distance(w[1])).sum();
        let displacement = match (positions.first(), positions.last()) {
            (Some(a), Some(b)) => a.distance(*b),
            _ => 0.0,
        };

        let curvature = euclidean_curvature(&positions);
        let speed = linear_speeds(samples);

        debug!(
            "Keyboard spatial features: segment={} samples={}",
            segment.segment_id,
            samples.len()
        );

        KeyboardSpatialFeatures {
            segment_id: segment.segment_id,
            start_time: segment.start_time,
            end_time: segment.end_time,
            sample_count: samples.len(),
            total_distance,
            displacement,
            efficiency: efficiency(displacement, total_distance),
            curvature_mean: curvature.mean,
            curvature_std_dev: curvature.std_dev,
            speed_mean: speed.mean,
            speed_std_dev: speed.std_dev,
        }
    }
}

/// Straight-over-travelled ratio, clamped to [0, 1]; 0 for an empty path
pub fn efficiency(displacement: f64, path_length: f64) -> f64 {
    ratio_or_zero(displacement, path_length).clamp(0.0, 1.0)
}

/// Sum of great-circle arcs between consecutive directions
pub fn spherical_path_length(directions: &[DVec3], radius: f64) -> f64 {
    directions
        .windows(2)
        .map(|w| arc_length(w[0], w[1], radius))
        .sum()
}

/// Travelled arc from sample 0 to sample `index` divided by the straight arc
/// between them; 0 when `index` is out of range or the path is closed
pub fn spherical_arc_ratio(directions: &[DVec3], index: usize, radius: f64) -> f64 {
    if index == 0 || index >= directions.len() {
        return 0.0;
    }
    let prefix = &directions[..=index];
    let travelled = spherical_path_length(prefix, radius);
    let straight = arc_length(prefix[0], prefix[index], radius);
    ratio_or_zero(travelled, straight)
}

/// Angles between successive great-circle normals (needs 3 directions)
pub fn spherical_curvature(directions: &[DVec3]) -> SampleStats {
    directions
        .windows(3)
        .filter_map(|w| turning_angle(w[0].cross(w[1]), w[1].cross(w[2])))
        .collect()
}

/// Angles between successive displacement vectors (needs 3 positions)
pub fn euclidean_curvature(positions: &[DVec3]) -> SampleStats {
    positions
        .windows(3)
        .filter_map(|w| turning_angle(w[1] - w[0], w[2] - w[1]))
        .collect()
}

/// Radians per second between consecutive mouse samples; pairs without elapsed time are skipped
pub fn angular_speeds(samples: &[MouseSpatialSample]) -> SampleStats {
    samples
        .windows(2)
        .filter_map(|w| {
            let dt = w[1].timestamp - w[0].timestamp;
            (dt > 0.0).then(|| angle_between(w[0].direction, w[1].direction) / dt)
        })
        .collect()
}

/// World units per second between consecutive keyboard samples; pairs
/// without elapsed time are skipped
pub fn linear_speeds(samples: &[KeyboardSpatialSample]) -> SampleStats {
    samples
        .windows(2)
        .filter_map(|w| {
            let dt = w[1].timestamp - w[0].timestamp;
            (dt > 0.0).then(|| w[0].position.distance(w[1].position) / dt)
        })
        .collect()
}
