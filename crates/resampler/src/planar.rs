//! Straight-line resampling of the player position

use crate::accumulator::ArcAccumulator;
use serde::{Deserialize, Serialize};
use telemetry_types::{DVec3, KeyboardSpatialSample};

/// Planar resampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarConfig {
    /// Distance between emitted samples (world units)
    pub spacing: f64,
    /// Moves shorter than this are treated as standing still
    pub min_step: f64,
}

impl Default for PlanarConfig {
    fn default() -> Self {
        Self {
            spacing: 0.1,
            min_step: 0.001,
        }
    }
}

/// Emits a sample every `spacing` of distance travelled by the player
#[derive(Debug, Clone)]
pub struct PlanarResampler {
    config: PlanarConfig,
    accumulator: ArcAccumulator,
    last_position: DVec3,
    last_timestamp: f64,
}

impl PlanarResampler {
    /// Start resampling from `position` at `timestamp`
    pub fn new(config: PlanarConfig, timestamp: f64, position: DVec3) -> Self {
        Self {
            accumulator: ArcAccumulator::new(config.spacing),
            config,
            last_position: position,
            last_timestamp: timestamp,
        }
    }

    pub fn config(&self) -> &PlanarConfig {
        &self.config
    }

    pub fn last_position(&self) -> DVec3 {
        self.last_position
    }

    /// Distance travelled since the last emitted sample
    pub fn accumulated_distance(&self) -> f64 {
        self.accumulator.accumulated()
    }

    /// Feed the player position for one tick; returns the samples emitted
    pub fn advance(&mut self, timestamp: f64, position: DVec3) -> Vec<KeyboardSpatialSample> {
        let step = position.distance(self.last_position);
        if !(step >= self.config.min_step) {
            return Vec::new();
        }

        let (from, from_time) = (self.last_position, self.last_timestamp);
        let samples = self
            .accumulator
            .advance(step)
            .into_iter()
            .map(|fraction| KeyboardSpatialSample {
                timestamp: from_time + (timestamp - from_time) * fraction,
                position: from.lerp(position, fraction),
            })
            .collect();

        self.last_position = position;
        self.last_timestamp = timestamp;
        samples
    }

    /// Drop accumulated distance and restart from `position`
    pub fn reset(&mut self, timestamp: f64, position: DVec3) {
        self.accumulator.reset();
        self.last_position = position;
        self.last_timestamp = timestamp;
    }

    /// Restart accumulation from the last known position
    pub fn restart(&mut self, timestamp: f64) {
        self.reset(timestamp, self.last_position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_line_spacing() {
        let mut resampler = PlanarResampler::new(PlanarConfig::default(), 0.0, DVec3::ZERO);
        let mut samples = Vec::new();
        for i in 1..=10 {
            let pos = DVec3::new(i as f64 * 0.237, 0.0, 0.0);
            samples.extend(resampler.advance(i as f64 * 0.1, pos));
        }

        assert_eq!(samples.len(), 23);
        for (k, sample) in samples.iter().enumerate() {
            let expected = (k + 1) as f64 * 0.1;
            assert!((sample.position.x - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_standing_still_ignored() {
        let mut resampler = PlanarResampler::new(PlanarConfig::default(), 0.0, DVec3::ZERO);
        assert!(resampler
            .advance(1.0, DVec3::new(0.0005, 0.0, 0.0))
            .is_empty());
        assert_eq!(resampler.last_position(), DVec3::ZERO);
        assert_eq!(resampler.accumulated_distance(), 0.0);
    }

    #[test]
    fn test_reset_drops_distance() {
        let mut resampler = PlanarResampler::new(PlanarConfig::default(), 0.0, DVec3::ZERO);
        resampler.advance(0.5, DVec3::new(0.05, 0.0, 0.0));
        resampler.reset(1.0, DVec3::new(5.0, 0.0, 0.0));

        assert_eq!(resampler.accumulated_distance(), 0.0);
        let samples = resampler.advance(2.0, DVec3::new(5.15, 0.0, 0.0));
        assert_eq!(samples.len(), 1);
        assert!((samples[0].position.x - 5.1).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_path_spacing_uniform(
            moves in proptest::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..50)
        ) {
            let mut resampler = PlanarResampler::new(PlanarConfig::default(), 0.0, DVec3::ZERO);
            let mut path = vec![DVec3::ZERO];
            let mut samples = Vec::new();
            let mut pos = DVec3::ZERO;
            for (i, (dx, dz)) in moves.iter().enumerate() {
                pos += DVec3::new(*dx, 0.0, *dz);
                path.push(pos);
                samples.extend(resampler.advance(i as f64 + 1.0, pos));
            }

            // skipped micro-moves can only shorten the resampled path
            let total: f64 = path.windows(2).map(|w| w[0].distance(w[1])).sum();
            prop_assert!(samples.len() as f64 <= total / 0.1 + 1e-6);
            for pair in samples.windows(2) {
                prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            }
        }
    }
}
