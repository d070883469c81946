//! Great-circle resampling of the camera direction

use crate::accumulator::ArcAccumulator;
use serde::{Deserialize, Serialize};
use telemetry_types::geometry::{direction, slerp};
use telemetry_types::{DVec3, MouseSpatialSample};
use tracing::trace;

/// Spherical resampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphericalConfig {
    /// Radius of the sampling sphere (world units)
    pub radius: f64,
    /// Arc length between emitted samples (world units on the sphere)
    pub arc_length: f64,
    /// Rotations below this angle (radians) are treated as no movement
    pub min_angle: f64,
    /// Samples discarded after every reset
    pub warmup_samples: usize,
}

impl Default for SphericalConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            arc_length: 0.25,
            min_angle: 0.00087, // ~0.05 degrees
            warmup_samples: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    direction: DVec3,
    timestamp: f64,
}

/// Emits a sample every `arc_length` of great-circle travel of the camera direction
#[derive(Debug, Clone)]
pub struct SphericalResampler {
    config: SphericalConfig,
    accumulator: ArcAccumulator,
    /// Sphere centre in world space
    center: DVec3,
    last: Option<Anchor>,
    emitted_since_reset: usize,
    /// Time of the latest crossing, warm-up crossings included
    last_crossing: Option<f64>,
}

impl SphericalResampler {
    pub fn new(config: SphericalConfig) -> Self {
        Self {
            accumulator: ArcAccumulator::new(config.arc_length),
            config,
            center: DVec3::ZERO,
            last: None,
            emitted_since_reset: 0,
            last_crossing: None,
        }
    }

    /// Place the sampling sphere (defaults to the origin)
    pub fn with_center(mut self, center: DVec3) -> Self {
        self.center = center;
        self
    }

    pub fn config(&self) -> &SphericalConfig {
        &self.config
    }

    /// Arc travelled since the last emitted sample
    pub fn accumulated_arc(&self) -> f64 {
        self.accumulator.accumulated()
    }

    /// Timestamp of the most recent arc crossing, including discarded warm-up samples
    pub fn last_crossing(&self) -> Option<f64> {
        self.last_crossing
    }

    /// Feed the camera direction for one tick.
    ///
    /// Returns the samples emitted during this tick that survived warm-up.
    /// `yaw` and `pitch` are the tick's camera angles and are attached as-is.
    pub fn advance(
        &mut self,
        timestamp: f64,
        forward: DVec3,
        yaw: f64,
        pitch: f64,
    ) -> Vec<MouseSpatialSample> {
        let Some(current) = direction(forward) else {
            return Vec::new();
        };
        let Some(last) = self.last else {
            self.last = Some(Anchor {
                direction: current,
                timestamp,
            });
            return Vec::new();
        };

        let theta = last.direction.dot(current).clamp(-1.0, 1.0).acos();
        if !(theta >= self.config.min_angle) {
            return Vec::new();
        }

        let crossings = self.accumulator.advance(self.config.radius * theta);
        let mut samples = Vec::with_capacity(crossings.len());
        for fraction in crossings {
            let sample_time = last.timestamp + (timestamp - last.timestamp) * fraction;
            self.last_crossing = Some(sample_time);
            self.emitted_since_reset += 1;
            if self.emitted_since_reset <= self.config.warmup_samples {
                continue;
            }

            let dir = slerp(last.direction, current, fraction);
            samples.push(MouseSpatialSample {
                timestamp: sample_time,
                position: self.center + dir * self.config.radius,
                yaw,
                pitch,
                direction: dir,
            });
        }

        if !samples.is_empty() {
            trace!("Emitted {} spherical samples at t={}", samples.len(), timestamp);
        }

        self.last = Some(Anchor {
            direction: current,
            timestamp,
        });
        samples
    }

    /// Drop accumulated arc and restart warm-up from `forward`
    pub fn reset(&mut self, timestamp: f64, forward: DVec3) {
        self.accumulator.reset();
        self.emitted_since_reset = 0;
        self.last = direction(forward).map(|direction| Anchor {
            direction,
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use telemetry_types::geometry::{angle_between, direction_from_yaw_pitch};

    fn no_warmup() -> SphericalConfig {
        SphericalConfig {
            warmup_samples: 0,
            ..Default::default()
        }
    }

    fn sweep(
        resampler: &mut SphericalResampler,
        degrees_per_tick: f64,
        ticks: usize,
    ) -> Vec<MouseSpatialSample> {
        let mut out = Vec::new();
        for i in 0..=ticks {
            let yaw = i as f64 * degrees_per_tick;
            let dir = direction_from_yaw_pitch(yaw, 0.0);
            out.extend(resampler.advance(i as f64 / 60.0, dir, yaw, 0.0));
        }
        out
    }

    #[test]
    fn test_uniform_arc_spacing() {
        let mut resampler = SphericalResampler::new(no_warmup());
        let samples = sweep(&mut resampler, 3.0, 120);

        assert!(samples.len() > 10);
        for pair in samples.windows(2) {
            let arc = 2.0 * angle_between(pair[0].direction, pair[1].direction);
            assert!((arc - 0.25).abs() < 1e-9, "arc {}", arc);
        }
    }

    #[test]
    fn test_positions_on_sphere() {
        let mut resampler =
            SphericalResampler::new(no_warmup()).with_center(DVec3::new(1.0, 2.0, 3.0));
        let samples = sweep(&mut resampler, 5.0, 30);

        for sample in &samples {
            let r = (sample.position - DVec3::new(1.0, 2.0, 3.0)).length();
            assert!((r - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_warmup_discards_first_samples() {
        let mut with_warmup = SphericalResampler::new(SphericalConfig::default());
        let mut without = SphericalResampler::new(no_warmup());

        let kept = sweep(&mut with_warmup, 3.0, 120);
        let all = sweep(&mut without, 3.0, 120);

        assert_eq!(all.len() - kept.len(), 10);
        assert_eq!(kept[0], all[10]);
    }

    #[test]
    fn test_small_rotation_skipped() {
        let mut resampler = SphericalResampler::new(no_warmup());
        resampler.advance(0.0, DVec3::Z, 0.0, 0.0);
        let tiny = direction_from_yaw_pitch(0.01, 0.0);
        assert!(resampler.advance(0.1, tiny, 0.01, 0.0).is_empty());
        assert_eq!(resampler.accumulated_arc(), 0.0);
    }

    #[test]
    fn test_zero_forward_ignored() {
        let mut resampler = SphericalResampler::new(no_warmup());
        resampler.advance(0.0, DVec3::Z, 0.0, 0.0);
        assert!(resampler.advance(0.1, DVec3::ZERO, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_multi_crossing_timestamps_interpolated() {
        let mut resampler = SphericalResampler::new(no_warmup());
        resampler.advance(0.0, direction_from_yaw_pitch(0.0, 0.0), 0.0, 0.0);
        // 0.51 rad * radius 2 = 1.02 arc => 4 crossings
        let yaw = 0.51f64.to_degrees();
        let samples = resampler.advance(1.0, direction_from_yaw_pitch(yaw, 0.0), yaw, 0.0);

        assert_eq!(samples.len(), 4);
        for (k, sample) in samples.iter().enumerate() {
            let expected = (k + 1) as f64 * 0.25 / 1.02;
            assert!((sample.timestamp - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_warmup_crossings_tracked() {
        let mut resampler = SphericalResampler::new(SphericalConfig::default());
        resampler.advance(0.0, DVec3::Z, 0.0, 0.0);
        assert_eq!(resampler.last_crossing(), None);

        let yaw = (0.3f64 / 2.0).to_degrees();
        let samples = resampler.advance(1.0, direction_from_yaw_pitch(yaw, 0.0), yaw, 0.0);
        assert!(samples.is_empty());
        assert!(resampler.last_crossing().is_some());
    }

    #[test]
    fn test_reset_restarts_warmup() {
        let config = SphericalConfig {
            warmup_samples: 2,
            ..Default::default()
        };
        let mut resampler = SphericalResampler::new(config);
        sweep(&mut resampler, 3.0, 60);
        resampler.reset(10.0, DVec3::Z);

        assert_eq!(resampler.accumulated_arc(), 0.0);
        // three crossings, two of them warm-up
        let yaw = (0.8f64 / 2.0).to_degrees();
        let samples = resampler.advance(11.0, direction_from_yaw_pitch(yaw, 0.0), yaw, 0.0);
        assert_eq!(samples.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_spacing_independent_of_tick_size(
            steps in proptest::collection::vec(0.1f64..20.0, 5..60)
        ) {
            let mut resampler = SphericalResampler::new(no_warmup());
            let mut yaw = 0.0;
            let mut samples = Vec::new();
            resampler.advance(0.0, direction_from_yaw_pitch(yaw, 0.0), yaw, 0.0);
            for (i, step) in steps.iter().enumerate() {
                yaw += step;
                let forward = direction_from_yaw_pitch(yaw, 0.0);
                samples.extend(resampler.advance(i as f64 + 1.0, forward, yaw, 0.0));
            }
            for pair in samples.windows(2) {
                let arc = 2.0 * angle_between(pair[0].direction, pair[1].direction);
                prop_assert!((arc - 0.25).abs() < 1e-6);
            }
        }
    }
}
