//! Spatial Resampler
//!
//! Turns continuous motion into samples spaced a fixed path length apart:
//! - [`SphericalResampler`]: camera direction on a sphere, great-circle arcs
//! - [`PlanarResampler`]: player position in world space, straight-line distance
//!
//! Spacing between consecutive emitted samples is exact regardless of how far
//! the signal moves in a single tick.

mod accumulator;
mod planar;
mod spherical;

pub use accumulator::ArcAccumulator;
pub use planar::{PlanarConfig, PlanarResampler};
pub use spherical::{SphericalConfig, SphericalResampler};
