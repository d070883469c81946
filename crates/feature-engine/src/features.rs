//! Feature record envelope

use crate::spatial::{KeyboardSpatialFeatures, MouseSpatialFeatures};
use crate::temporal::{KeyboardTemporalFeatures, MouseTemporalFeatures};
use serde::{Deserialize, Serialize};

/// Any write-once feature aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureRecord {
    MouseSpatial(MouseSpatialFeatures),
    MouseTemporal(MouseTemporalFeatures),
    KeyboardSpatial(KeyboardSpatialFeatures),
    KeyboardTemporal(KeyboardTemporalFeatures),
}

impl FeatureRecord {
    /// Number of samples the record was computed from
    pub fn sample_count(&self) -> usize {
        match self {
            Self::MouseSpatial(f) => f.sample_count,
            Self::MouseTemporal(f) => f.sample_count,
            Self::KeyboardSpatial(f) => f.sample_count,
            Self::KeyboardTemporal(f) => f.sample_count,
        }
    }

    /// Time of the last sample covered
    pub fn end_time(&self) -> f64 {
        match self {
            Self::MouseSpatial(f) => f.end_time,
            Self::MouseTemporal(f) => f.end_time,
            Self::KeyboardSpatial(f) => f.end_time,
            Self::KeyboardTemporal(f) => f.end_time,
        }
    }
}

impl From<MouseSpatialFeatures> for FeatureRecord {
    fn from(f: MouseSpatialFeatures) -> Self {
        Self::MouseSpatial(f)
    }
}

impl From<MouseTemporalFeatures> for FeatureRecord {
    fn from(f: MouseTemporalFeatures) -> Self {
        Self::MouseTemporal(f)
    }
}

impl From<KeyboardSpatialFeatures> for FeatureRecord {
    fn from(f: KeyboardSpatialFeatures) -> Self {
        Self::KeyboardSpatial(f)
    }
}

impl From<KeyboardTemporalFeatures> for FeatureRecord {
    fn from(f: KeyboardTemporalFeatures) -> Self {
        Self::KeyboardTemporal(f)
    }
}
