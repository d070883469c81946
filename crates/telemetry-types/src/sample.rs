//! Raw and resampled samples, closed segments

use crate::geometry::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Keys the pipeline distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Space,
    LeftShift,
    E,
    Escape,
    /// Any other key, by host scan code
    Other(u16),
}

impl KeyCode {
    /// Movement keys in directional histogram order
    pub const DIRECTIONAL: [KeyCode; 8] = [
        KeyCode::W,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::UpArrow,
        KeyCode::DownArrow,
        KeyCode::LeftArrow,
        KeyCode::RightArrow,
    ];

    /// Histogram bin of a movement key
    pub fn directional_index(self) -> Option<usize> {
        Self::DIRECTIONAL.iter().position(|&k| k == self)
    }
}

/// Anything carrying a sample time
pub trait Timestamped {
    fn timestamp(&self) -> f64;
}

/// Raw mouse sample, one per tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseTemporalSample {
    pub timestamp: f64,
    /// Pointer delta this tick
    pub delta: DVec2,
    /// Gaze reference point in world space
    pub position: DVec3,
    /// Unit camera forward
    pub direction: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    /// Degrees per second of combined yaw/pitch change
    pub angular_speed: f64,
    /// Heading of the yaw/pitch change, degrees
    pub angle: f64,
    pub left_click_duration: f64,
    pub middle_click_duration: f64,
    pub right_click_duration: f64,
}

impl MouseTemporalSample {
    /// Whether any button was released during this tick
    pub fn clicked(&self) -> bool {
        self.left_click_duration > 0.0
            || self.middle_click_duration > 0.0
            || self.right_click_duration > 0.0
    }
}

impl Timestamped for MouseTemporalSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Raw keyboard sample, one per key transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardTemporalSample {
    pub timestamp: f64,
    pub key: KeyCode,
    /// Hold duration, non-zero on release samples only
    pub hold_time: f64,
    /// Time since the previous key release, non-zero on press samples only
    pub seek_time: f64,
    /// Time since the previous key press (release samples)
    pub key_latency2: f64,
    /// Time since the press before the previous one (release samples)
    pub key_latency3: f64,
}

impl Timestamped for KeyboardTemporalSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Point emitted by the spherical resampler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseSpatialSample {
    pub timestamp: f64,
    /// Point on the sampling sphere
    pub position: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    /// Unit direction from the sphere centre
    pub direction: DVec3,
}

impl Timestamped for MouseSpatialSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Point emitted by the planar resampler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardSpatialSample {
    pub timestamp: f64,
    pub position: DVec3,
}

impl Timestamped for KeyboardSpatialSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// A closed, immutable run of spatial samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment<S> {
    pub segment_id: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub samples: Vec<S>,
}

impl<S: Timestamped> Segment<S> {
    /// Close a run of samples under the given ID
    pub fn seal(segment_id: u32, samples: Vec<S>) -> Self {
        let start_time = samples.first().map(Timestamped::timestamp).unwrap_or(0.0);
        let end_time = samples.last().map(Timestamped::timestamp).unwrap_or(0.0);
        Self {
            segment_id,
            start_time,
            end_time,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

pub type MouseSegment = Segment<MouseSpatialSample>;
pub type KeyboardSegment = Segment<KeyboardSpatialSample>;

impl Segment<KeyboardSpatialSample> {
    pub fn start_position(&self) -> DVec3 {
        self.samples.first().map(|s| s.position).unwrap_or(DVec3::ZERO)
    }

    pub fn end_position(&self) -> DVec3 {
        self.samples.last().map(|s| s.position).unwrap_or(DVec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_index() {
        assert_eq!(KeyCode::W.directional_index(), Some(0));
        assert_eq!(KeyCode::RightArrow.directional_index(), Some(7));
        assert_eq!(KeyCode::Space.directional_index(), None);
        assert_eq!(KeyCode::Other(42).directional_index(), None);
    }

    #[test]
    fn test_seal_keyboard_segment() {
        let samples = vec![
            KeyboardSpatialSample {
                timestamp: 1.0,
                position: DVec3::ZERO,
            },
            KeyboardSpatialSample {
                timestamp: 2.5,
                position: DVec3::new(0.3, 0.0, 0.0),
            },
        ];
        let segment = Segment::seal(4, samples);

        assert_eq!(segment.segment_id, 4);
        assert_eq!(segment.start_time, 1.0);
        assert_eq!(segment.end_time, 2.5);
        assert_eq!(segment.end_position(), DVec3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn test_seal_empty_segment() {
        let segment: MouseSegment = Segment::seal(0, Vec::new());
        assert!(segment.is_empty());
        assert_eq!(segment.start_time, 0.0);
    }
}
