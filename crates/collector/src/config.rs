//! Collector configuration

use crate::CollectorError;
use feature_engine::{SpatialConfig, TemporalConfig};
use resampler::{PlanarConfig, SphericalConfig};
use serde::{Deserialize, Serialize};

/// Mouse collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    /// Great-circle resampling of the camera direction
    pub resampler: SphericalConfig,
    /// Spatial samples retained per segment before the oldest is drained
    pub spatial_buffer_size: usize,
    /// Seconds without an arc crossing before the segment closes
    pub segment_timeout: f64,
    /// Raw samples per temporal window
    pub temporal_window: usize,
    pub spatial: SpatialConfig,
    pub temporal: TemporalConfig,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            resampler: SphericalConfig::default(),
            spatial_buffer_size: 50,
            segment_timeout: 2.0,
            temporal_window: 60,
            spatial: SpatialConfig::default(),
            temporal: TemporalConfig::default(),
        }
    }
}

/// Keyboard collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Distance resampling of the player position
    pub resampler: PlanarConfig,
    /// Seconds a key transition may wait before the temporal window is flushed
    pub flush_interval: f64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            resampler: PlanarConfig::default(),
            flush_interval: 1.0,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub mouse: MouseConfig,
    pub keyboard: KeyboardConfig,
}

impl CollectorConfig {
    /// Reject zero capacities and non-positive thresholds
    pub fn validate(&self) -> Result<(), CollectorError> {
        let mouse = &self.mouse;
        positive("mouse.resampler.radius", mouse.resampler.radius)?;
        positive("mouse.resampler.arc_length", mouse.resampler.arc_length)?;
        non_negative("mouse.resampler.min_angle", mouse.resampler.min_angle)?;
        non_zero("mouse.spatial_buffer_size", mouse.spatial_buffer_size)?;
        positive("mouse.segment_timeout", mouse.segment_timeout)?;
        non_zero("mouse.temporal_window", mouse.temporal_window)?;
        non_zero("mouse.spatial.sampling_count", mouse.spatial.sampling_count)?;
        non_zero("mouse.spatial.arc_ratio_stride", mouse.spatial.arc_ratio_stride)?;
        positive("mouse.spatial.turn_bin_degrees", mouse.spatial.turn_bin_degrees)?;
        positive(
            "mouse.temporal.fixation_speed_threshold",
            mouse.temporal.fixation_speed_threshold,
        )?;
        non_negative("mouse.temporal.fixation_min_duration", mouse.temporal.fixation_min_duration)?;

        if (mouse.spatial.radius - mouse.resampler.radius).abs() > f64::EPSILON {
            return Err(CollectorError::Config(format!(
                "mouse.spatial.radius ({}) differs from mouse.resampler.radius ({})",
                mouse.spatial.radius, mouse.resampler.radius
            )));
        }

        let keyboard = &self.keyboard;
        positive("keyboard.resampler.spacing", keyboard.resampler.spacing)?;
        non_negative("keyboard.resampler.min_step", keyboard.resampler.min_step)?;
        positive("keyboard.flush_interval", keyboard.flush_interval)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), CollectorError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CollectorError::Config(format!("{} must be positive, got {}", name, value)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), CollectorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CollectorError::Config(format!("{} must not be negative, got {}", name, value)))
    }
}

fn non_zero(name: &str, value: usize) -> Result<(), CollectorError> {
    if value > 0 {
        Ok(())
    } else {
        Err(CollectorError::Config(format!("{} must be at least 1", name)))
    }
}
