//! Telemetry Types
//!
//! Shared vocabulary of the input feature pipeline:
//! - Per-tick input snapshots handed over by the host
//! - Raw temporal samples and resampled spatial samples
//! - Closed segments
//! - Vector geometry on the unit sphere and in Euclidean space
//! - Tick validation

mod error;
mod event;
pub mod geometry;
mod sample;
mod validator;

pub use error::InputError;
pub use event::{ButtonReleases, KeyAction, KeyTransition, KeyboardSnapshot, MouseSnapshot, Tick};
pub use geometry::{DVec2, DVec3};
pub use sample::{
    KeyCode, KeyboardSegment, KeyboardSpatialSample, KeyboardTemporalSample, MouseSegment,
    MouseSpatialSample, MouseTemporalSample, Segment, Timestamped,
};
pub use validator::TickValidator;
