//! Sample Ingestion
//!
//! Derives raw temporal samples from per-tick snapshots.

use telemetry_types::{
    KeyAction, KeyTransition, KeyboardTemporalSample, MouseSnapshot, MouseTemporalSample,
};

#[derive(Debug, Clone, Copy)]
struct Pose {
    timestamp: f64,
    yaw: f64,
    pitch: f64,
}

/// Turns consecutive camera poses into angular speed and turn direction
#[derive(Debug, Clone, Default)]
pub struct MouseMotionTracker {
    last: Option<Pose>,
}

impl MouseMotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the raw sample for one tick.
    ///
    /// Angular speed is degrees per second of combined yaw/pitch change since
    /// the previous tick; the first tick, and ticks without elapsed time,
    /// report zero motion.
    pub fn sample(&mut self, timestamp: f64, mouse: &MouseSnapshot) -> MouseTemporalSample {
        let (angular_speed, angle) = match self.last {
            Some(prev) if timestamp > prev.timestamp => {
                let d_yaw = mouse.yaw - prev.yaw;
                let d_pitch = mouse.pitch - prev.pitch;
                let dt = timestamp - prev.timestamp;
                (
                    d_yaw.hypot(d_pitch) / dt,
                    d_pitch.atan2(d_yaw).to_degrees(),
                )
            }
            _ => (0.0, 0.0),
        };

        self.last = Some(Pose {
            timestamp,
            yaw: mouse.yaw,
            pitch: mouse.pitch,
        });

        MouseTemporalSample {
            timestamp,
            delta: mouse.delta,
            position: mouse.reference_point,
            direction: mouse.forward.normalize_or_zero(),
            yaw: mouse.yaw,
            pitch: mouse.pitch,
            angular_speed,
            angle,
            left_click_duration: mouse.released.left,
            middle_click_duration: mouse.released.middle,
            right_click_duration: mouse.released.right,
        }
    }

    /// Forget the previous pose
    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Tracks press/release history for hold, seek and latency timings
#[derive(Debug, Clone, Default)]
pub struct KeyTimingTracker {
    prev_key_down: Option<f64>,
    prev2_key_down: Option<f64>,
    prev_key_up: Option<f64>,
}

impl KeyTimingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the raw sample for one key transition at `timestamp`
    pub fn record(&mut self, timestamp: f64, transition: &KeyTransition) -> KeyboardTemporalSample {
        let mut sample = KeyboardTemporalSample {
            timestamp,
            key: transition.key,
            hold_time: 0.0,
            seek_time: 0.0,
            key_latency2: 0.0,
            key_latency3: 0.0,
        };

        match transition.action {
            KeyAction::Pressed => {
                if let (Some(_), Some(up)) = (self.prev_key_down, self.prev_key_up) {
                    sample.seek_time = timestamp - up;
                }
                self.prev2_key_down = self.prev_key_down;
                self.prev_key_down = Some(timestamp);
            }
            KeyAction::Released { held } => {
                sample.hold_time = held;
                sample.key_latency2 = self.prev_key_down.map_or(0.0, |t| timestamp - t);
                sample.key_latency3 = self.prev2_key_down.map_or(0.0, |t| timestamp - t);
                self.prev_key_up = Some(timestamp);
            }
        }

        sample
    }
}
