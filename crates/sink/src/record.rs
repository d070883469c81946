//! Destinations and the records written to them

use feature_engine::{
    FeatureRecord, KeyboardSpatialFeatures, KeyboardTemporalFeatures, MouseSpatialFeatures,
    MouseTemporalFeatures,
};
use serde::{Deserialize, Serialize};
use telemetry_types::{
    KeyboardSegment, KeyboardSpatialSample, KeyboardTemporalSample, MouseSpatialSample,
    MouseTemporalSample,
};

/// Named output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Destination {
    MouseSpatialData,
    MouseTemporalData,
    MouseSpatialFeatureData,
    MouseTemporalFeatureData,
    KeyboardSpatialData,
    KeyboardTemporalData,
    KeyboardSpatialFeatureData,
    KeyboardTemporalFeatureData,
}

impl Destination {
    pub const ALL: [Destination; 8] = [
        Destination::MouseSpatialData,
        Destination::MouseTemporalData,
        Destination::MouseSpatialFeatureData,
        Destination::MouseTemporalFeatureData,
        Destination::KeyboardSpatialData,
        Destination::KeyboardTemporalData,
        Destination::KeyboardSpatialFeatureData,
        Destination::KeyboardTemporalFeatureData,
    ];

    /// File name of the stream inside a session directory
    pub fn file_name(self) -> &'static str {
        match self {
            Destination::MouseSpatialData => "MouseSpatialData.jsonl",
            Destination::MouseTemporalData => "MouseTemporalData.jsonl",
            Destination::MouseSpatialFeatureData => "MouseSpatialFeatureData.jsonl",
            Destination::MouseTemporalFeatureData => "MouseTemporalFeatureData.jsonl",
            Destination::KeyboardSpatialData => "KeyboardSpatialData.jsonl",
            Destination::KeyboardTemporalData => "KeyboardTemporalData.jsonl",
            Destination::KeyboardSpatialFeatureData => "KeyboardSpatialFeatureData.jsonl",
            Destination::KeyboardTemporalFeatureData => "KeyboardTemporalFeatureData.jsonl",
        }
    }
}

/// Anything the pipeline persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    MouseSpatial(MouseSpatialSample),
    MouseTemporal(MouseTemporalSample),
    KeyboardSpatial(KeyboardSpatialSample),
    KeyboardTemporal(KeyboardTemporalSample),
    KeyboardSegment(KeyboardSegment),
    Feature(FeatureRecord),
}

impl From<MouseSpatialSample> for Record {
    fn from(s: MouseSpatialSample) -> Self {
        Record::MouseSpatial(s)
    }
}

impl From<MouseTemporalSample> for Record {
    fn from(s: MouseTemporalSample) -> Self {
        Record::MouseTemporal(s)
    }
}

impl From<KeyboardSpatialSample> for Record {
    fn from(s: KeyboardSpatialSample) -> Self {
        Record::KeyboardSpatial(s)
    }
}

impl From<KeyboardTemporalSample> for Record {
    fn from(s: KeyboardTemporalSample) -> Self {
        Record::KeyboardTemporal(s)
    }
}

impl From<KeyboardSegment> for Record {
    fn from(s: KeyboardSegment) -> Self {
        Record::KeyboardSegment(s)
    }
}

impl From<FeatureRecord> for Record {
    fn from(f: FeatureRecord) -> Self {
        Record::Feature(f)
    }
}

impl From<MouseSpatialFeatures> for Record {
    fn from(f: MouseSpatialFeatures) -> Self {
        Record::Feature(f.into())
    }
}

impl From<MouseTemporalFeatures> for Record {
    fn from(f: MouseTemporalFeatures) -> Self {
        Record::Feature(f.into())
    }
}

impl From<KeyboardSpatialFeatures> for Record {
    fn from(f: KeyboardSpatialFeatures) -> Self {
        Record::Feature(f.into())
    }
}

impl From<KeyboardTemporalFeatures> for Record {
    fn from(f: KeyboardTemporalFeatures) -> Self {
        Record::Feature(f.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_unique() {
        let names: HashSet<_> = Destination::ALL.iter().map(|d| d.file_name()).collect();
        assert_eq!(names.len(), Destination::ALL.len());
        assert!(names.iter().all(|n| n.ends_with(".jsonl")));
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::from(KeyboardSpatialSample {
            timestamp: 1.5,
            position: telemetry_types::DVec3::new(1.0, 0.0, 2.0),
        });
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"timestamp":1.5,"position":[1.0,0.0,2.0]}"#);
    }
}
