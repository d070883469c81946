//! Feature Engine
//!
//! Statistical descriptors over resampled segments and raw sample windows:
//! - Spatial: path length, efficiency, curvature, speed, arc ratios, turn histogram
//! - Temporal: angular speed, fixations, click/press density, key timing, directional keys

mod features;
pub mod histogram;
pub mod spatial;
pub mod statistics;
pub mod temporal;

pub use features::FeatureRecord;
pub use spatial::{
    KeyboardSpatialFeatures, MouseSpatialFeatures, SpatialConfig, SpatialExtractor, WindowKind,
};
pub use statistics::SampleStats;
pub use temporal::{
    Fixations, KeyboardTemporalFeatures, MouseTemporalFeatures, TemporalConfig, TemporalExtractor,
};
