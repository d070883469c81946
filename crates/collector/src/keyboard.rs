//! Keyboard collection: key timing window, locomotion segments

use crate::config::KeyboardConfig;
use crate::ingest::KeyTimingTracker;
use crate::live::LiveView;
use crate::publish;
use feature_engine::{
    FeatureRecord, KeyboardSpatialFeatures, KeyboardTemporalFeatures, SpatialExtractor,
    TemporalExtractor,
};
use resampler::PlanarResampler;
use sample_window::FlushBuffer;
use sink::{Destination, Record, Sink, SinkError};
use telemetry_types::{KeyboardSnapshot, KeyboardSpatialSample, KeyboardTemporalSample, Segment};
use tracing::{debug, info};

pub struct KeyboardCollector {
    config: KeyboardConfig,
    timing: KeyTimingTracker,
    /// Created on the first tick, at the player's starting position
    resampler: Option<PlanarResampler>,
    segment: Vec<KeyboardSpatialSample>,
    segment_id: u32,
    temporal: FlushBuffer<KeyboardTemporalSample>,
    spatial_extractor: SpatialExtractor,
    temporal_extractor: TemporalExtractor,
}

impl KeyboardCollector {
    pub fn new(config: KeyboardConfig) -> Self {
        Self {
            config,
            timing: KeyTimingTracker::new(),
            resampler: None,
            segment: Vec::new(),
            segment_id: 0,
            temporal: FlushBuffer::new(),
            spatial_extractor: SpatialExtractor::default(),
            temporal_extractor: TemporalExtractor::default(),
        }
    }

    /// ID of the open segment
    pub fn segment_id(&self) -> u32 {
        self.segment_id
    }

    /// Samples in the open segment, seed included
    pub fn segment_len(&self) -> usize {
        self.segment.len()
    }

    /// Key transitions waiting for the next window flush
    pub fn pending_transitions(&self) -> usize {
        self.temporal.len()
    }

    /// Process one tick; returns the number of spatial samples emitted
    pub fn ingest<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        keyboard: &KeyboardSnapshot,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<usize, SinkError> {
        for transition in &keyboard.transitions {
            let sample = self.timing.record(timestamp, transition);
            self.temporal.push(timestamp, sample);
        }
        // a failed window write still lets this tick's movement through
        let mut result = Ok(());
        if self.temporal.age(timestamp) >= self.config.flush_interval {
            result = self
                .flush_window(sink)
                .map(|window| features.extend(window.map(FeatureRecord::from)));
        }

        if self.resampler.is_none() {
            self.start(timestamp, keyboard);
            return result.map(|()| 0);
        }
        let Some(resampler) = self.resampler.as_mut() else {
            return result.map(|()| 0);
        };

        let emitted = resampler.advance(timestamp, keyboard.position);
        let count = emitted.len();
        if count > 0 {
            metrics::counter!("spatial_samples_emitted", "modality" => "keyboard")
                .increment(count as u64);
        }
        for sample in &emitted {
            view.notify("keyboard.spatial.x", sample.timestamp, sample.position.x);
            view.notify("keyboard.spatial.z", sample.timestamp, sample.position.z);
        }
        self.segment.extend(emitted);
        result.map(|()| count)
    }

    fn start(&mut self, timestamp: f64, keyboard: &KeyboardSnapshot) {
        self.resampler = Some(PlanarResampler::new(
            self.config.resampler.clone(),
            timestamp,
            keyboard.position,
        ));
        self.segment = vec![KeyboardSpatialSample {
            timestamp,
            position: keyboard.position,
        }];
    }

    /// Seal the open segment, log it with its features and open the next one.
    ///
    /// Returns `None` before the first tick has been seen.
    pub fn close_segment<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        sink: &mut S,
        view: &mut V,
    ) -> Result<Option<KeyboardSpatialFeatures>, SinkError> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(None);
        };

        resampler.restart(timestamp);
        let seed = KeyboardSpatialSample {
            timestamp,
            position: resampler.last_position(),
        };
        let samples = std::mem::replace(&mut self.segment, vec![seed]);
        let segment = Segment::seal(self.segment_id, samples);
        let spatial = self.spatial_extractor.extract_keyboard(&segment);

        info!(
            "Keyboard segment {} closed with {} samples",
            segment.segment_id,
            segment.len()
        );
        let logged = sink.append(Destination::KeyboardSpatialData, &Record::from(segment));
        let published = publish(
            sink,
            Destination::KeyboardSpatialFeatureData,
            spatial.clone().into(),
        );
        metrics::counter!("segments_closed", "modality" => "keyboard").increment(1);
        view.notify("keyboard.efficiency", timestamp, spatial.efficiency);
        view.mark(timestamp, "keyboard_segment_closed");

        self.segment_id += 1;
        logged.and(published).map(|_| Some(spatial))
    }

    /// Extract features over the buffered key transitions and drain them.
    ///
    /// Returns `None` when nothing was buffered.
    pub fn flush_window<S: Sink>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<KeyboardTemporalFeatures>, SinkError> {
        if self.temporal.is_empty() {
            return Ok(None);
        }

        let window = self.temporal_extractor.extract_keyboard(self.temporal.as_slice());
        let feature = window.clone().into();
        let mut result =
            publish(sink, Destination::KeyboardTemporalFeatureData, feature).map(|_| ());
        for sample in self.temporal.take() {
            let logged = sink.append(Destination::KeyboardTemporalData, &Record::from(sample));
            result = result.and(logged);
        }
        debug!("Keyboard window flushed with {} transitions", window.sample_count);
        result.map(|()| Some(window))
    }

    /// Flush the key window and close the open segment, seed-only ones included
    pub fn finish<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<(), SinkError> {
        let flushed = self
            .flush_window(sink)
            .map(|window| features.extend(window.map(FeatureRecord::from)));
        let closed = self
            .close_segment(timestamp, sink, view)
            .map(|spatial| features.extend(spatial.map(FeatureRecord::from)));
        flushed.and(closed)
    }

    /// Restart from the current position after a recording pause
    pub fn resume(&mut self, timestamp: f64, keyboard: &KeyboardSnapshot) {
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset(timestamp, keyboard.position);
        }
    }
}
