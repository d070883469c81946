//! Tick Validator

use crate::error::InputError;
use crate::event::{KeyAction, Tick};
use crate::geometry::{DVec2, DVec3};
use tracing::debug;

/// Rejects ticks that would corrupt window ordering or feed NaN into extractors
#[derive(Debug, Clone, Default)]
pub struct TickValidator {
    last_timestamp: Option<f64>,
}

impl TickValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last accepted tick
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Validate a tick and, if accepted, remember its timestamp
    pub fn validate(&mut self, tick: &Tick) -> Result<(), InputError> {
        if let Err(e) = self.check(tick) {
            debug!("Rejected tick at {}: {}", tick.timestamp, e);
            return Err(e);
        }
        self.last_timestamp = Some(tick.timestamp);
        Ok(())
    }

    /// Validate a bare timestamp (used for out-of-band signals like segment closes)
    pub fn validate_timestamp(&self, timestamp: f64) -> Result<(), InputError> {
        Self::check_finite("timestamp", timestamp)?;
        match self.last_timestamp {
            Some(previous) if timestamp < previous => Err(InputError::NonMonotonic {
                previous,
                current: timestamp,
            }),
            _ => Ok(()),
        }
    }

    fn check(&self, tick: &Tick) -> Result<(), InputError> {
        self.validate_timestamp(tick.timestamp)?;

        let mouse = &tick.mouse;
        Self::check_vec2("mouse.delta", mouse.delta)?;
        Self::check_finite("mouse.yaw", mouse.yaw)?;
        Self::check_finite("mouse.pitch", mouse.pitch)?;
        Self::check_vec3("mouse.forward", mouse.forward)?;
        Self::check_vec3("mouse.reference_point", mouse.reference_point)?;
        Self::check_duration("mouse.released.left", mouse.released.left)?;
        Self::check_duration("mouse.released.middle", mouse.released.middle)?;
        Self::check_duration("mouse.released.right", mouse.released.right)?;

        Self::check_vec3("keyboard.position", tick.keyboard.position)?;
        for transition in &tick.keyboard.transitions {
            if let KeyAction::Released { held } = transition.action {
                Self::check_duration("keyboard.transitions.held", held)?;
            }
        }
        Ok(())
    }

    fn check_finite(field: &'static str, value: f64) -> Result<(), InputError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(InputError::NonFinite { field })
        }
    }

    fn check_vec2(field: &'static str, value: DVec2) -> Result<(), InputError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(InputError::NonFinite { field })
        }
    }

    fn check_vec3(field: &'static str, value: DVec3) -> Result<(), InputError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(InputError::NonFinite { field })
        }
    }

    fn check_duration(field: &'static str, value: f64) -> Result<(), InputError> {
        Self::check_finite(field, value)?;
        if value < 0.0 {
            Err(InputError::NegativeDuration { field, value })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyTransition;
    use crate::sample::KeyCode;

    #[test]
    fn test_accepts_monotonic_ticks() {
        let mut validator = TickValidator::new();
        assert!(validator.validate(&Tick::at(0.0)).is_ok());
        assert!(validator.validate(&Tick::at(0.0)).is_ok());
        assert!(validator.validate(&Tick::at(0.016)).is_ok());
        assert_eq!(validator.last_timestamp(), Some(0.016));
    }

    #[test]
    fn test_rejects_backwards_tick_without_commit() {
        let mut validator = TickValidator::new();
        validator.validate(&Tick::at(2.0)).unwrap();

        let err = validator.validate(&Tick::at(1.0)).unwrap_err();
        assert_eq!(
            err,
            InputError::NonMonotonic {
                previous: 2.0,
                current: 1.0
            }
        );
        assert_eq!(validator.last_timestamp(), Some(2.0));
    }

    #[test]
    fn test_rejects_nan_forward() {
        let mut validator = TickValidator::new();
        let mut tick = Tick::at(0.0);
        tick.mouse.forward = DVec3::new(f64::NAN, 0.0, 1.0);

        assert_eq!(
            validator.validate(&tick),
            Err(InputError::NonFinite {
                field: "mouse.forward"
            })
        );
        assert_eq!(validator.last_timestamp(), None);
    }

    #[test]
    fn test_rejects_negative_hold() {
        let mut validator = TickValidator::new();
        let mut tick = Tick::at(0.0);
        tick.keyboard
            .transitions
            .push(KeyTransition::released(KeyCode::W, -0.5));

        assert!(matches!(
            validator.validate(&tick),
            Err(InputError::NegativeDuration { .. })
        ));
    }
}
