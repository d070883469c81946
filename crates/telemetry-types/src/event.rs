//! Per-tick input snapshots

use crate::geometry::{DVec2, DVec3};
use crate::sample::KeyCode;
use serde::{Deserialize, Serialize};

/// Hold durations of mouse buttons released during this tick (0 = not released)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonReleases {
    pub left: f64,
    pub middle: f64,
    pub right: f64,
}

/// Mouse and camera state for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseSnapshot {
    /// Raw pointer delta
    #[serde(default)]
    pub delta: DVec2,
    /// Camera yaw in degrees
    pub yaw: f64,
    /// Camera pitch in degrees
    pub pitch: f64,
    /// Camera forward vector (normalised by the consumer)
    pub forward: DVec3,
    /// World position of the gaze reference point
    pub reference_point: DVec3,
    #[serde(default)]
    pub released: ButtonReleases,
}

impl Default for MouseSnapshot {
    fn default() -> Self {
        Self {
            delta: DVec2::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            forward: DVec3::Z,
            reference_point: DVec3::Z,
            released: ButtonReleases::default(),
        }
    }
}

/// Key state change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum KeyAction {
    Pressed,
    Released {
        /// How long the key was held (seconds)
        held: f64,
    },
}

/// One key press or release observed this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyTransition {
    pub key: KeyCode,
    #[serde(flatten)]
    pub action: KeyAction,
}

impl KeyTransition {
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            action: KeyAction::Pressed,
        }
    }

    pub fn released(key: KeyCode, held: f64) -> Self {
        Self {
            key,
            action: KeyAction::Released { held },
        }
    }
}

/// Keyboard-driven locomotion state for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardSnapshot {
    /// Player world position
    pub position: DVec3,
    #[serde(default)]
    pub transitions: Vec<KeyTransition>,
}

/// One coherent snapshot of every modality, taken once per host tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Monotonic host time in seconds
    pub timestamp: f64,
    #[serde(default)]
    pub mouse: MouseSnapshot,
    #[serde(default)]
    pub keyboard: KeyboardSnapshot,
}

impl Tick {
    /// Tick carrying only a timestamp, with every other field at rest
    pub fn at(timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_parses_with_defaults() {
        let json = r#"{"timestamp": 1.5, "keyboard": {"position": [1.0, 0.0, 2.0],
            "transitions": [{"key": "W", "action": "pressed"},
                            {"key": "A", "action": "released", "held": 0.25}]}}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.timestamp, 1.5);
        assert_eq!(tick.mouse.forward, DVec3::Z);
        assert_eq!(tick.keyboard.transitions.len(), 2);
        assert_eq!(
            tick.keyboard.transitions[1],
            KeyTransition::released(KeyCode::A, 0.25)
        );
    }
}
