//! Mouse collection: temporal window, spherical segments, inactivity timeout

use crate::config::MouseConfig;
use crate::ingest::MouseMotionTracker;
use crate::live::LiveView;
use crate::publish;
use feature_engine::{FeatureRecord, SpatialExtractor, TemporalExtractor, WindowKind};
use resampler::SphericalResampler;
use sample_window::SlidingWindow;
use sink::{Destination, Record, Sink, SinkError};
use telemetry_types::{MouseSnapshot, MouseSpatialSample, MouseTemporalSample};
use tracing::{debug, info};

pub struct MouseCollector {
    config: MouseConfig,
    motion: MouseMotionTracker,
    resampler: SphericalResampler,
    /// Open segment, newest samples retained
    spatial: SlidingWindow<MouseSpatialSample>,
    temporal: SlidingWindow<MouseTemporalSample>,
    spatial_extractor: SpatialExtractor,
    temporal_extractor: TemporalExtractor,
    segment_id: u32,
    /// Start of the open segment or latest arc crossing, whichever is later
    last_activity: Option<f64>,
}

impl MouseCollector {
    pub fn new(config: MouseConfig) -> Self {
        Self {
            motion: MouseMotionTracker::new(),
            resampler: SphericalResampler::new(config.resampler.clone()),
            spatial: SlidingWindow::new(config.spatial_buffer_size),
            temporal: SlidingWindow::new(config.temporal_window),
            spatial_extractor: SpatialExtractor::new(config.spatial.clone()),
            temporal_extractor: TemporalExtractor::new(config.temporal.clone()),
            segment_id: 0,
            last_activity: None,
            config,
        }
    }

    /// ID of the open segment
    pub fn segment_id(&self) -> u32 {
        self.segment_id
    }

    /// Spatial samples held by the open segment
    pub fn segment_len(&self) -> usize {
        self.spatial.len()
    }

    pub fn temporal_len(&self) -> usize {
        self.temporal.len()
    }

    /// Process one tick; returns the number of spatial samples added to the segment
    pub fn ingest<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        mouse: &MouseSnapshot,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<usize, SinkError> {
        // a failed write never skips a step; the first error is returned
        let mut result = self.sample_temporal(timestamp, mouse, sink, features);

        let last_activity = *self.last_activity.get_or_insert(timestamp);
        if timestamp - last_activity >= self.config.segment_timeout {
            if self.spatial.is_empty() {
                debug!("Mouse idle at t={}, restarting resampler", timestamp);
            } else {
                result = result.and(self.seal_segment(timestamp, sink, view, features));
            }
            self.restart_segment(timestamp, mouse);
        }

        let spatial = self.sample_spatial(timestamp, mouse, sink, view, features);
        result.and(spatial)
    }

    fn sample_temporal<S: Sink>(
        &mut self,
        timestamp: f64,
        mouse: &MouseSnapshot,
        sink: &mut S,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<(), SinkError> {
        let sample = self.motion.sample(timestamp, mouse);
        let mut result = Ok(());
        if let Some(oldest) = self.temporal.push(sample) {
            result = sink.append(Destination::MouseTemporalData, &Record::from(oldest));
        }

        if self.temporal.is_full() {
            let window = self.temporal_extractor.extract_mouse(self.temporal.as_slice());
            let published = publish(sink, Destination::MouseTemporalFeatureData, window.into());
            result = result.and(published.map(|f| features.push(f)));
        }
        result
    }

    fn sample_spatial<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        mouse: &MouseSnapshot,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<usize, SinkError> {
        let emitted = self
            .resampler
            .advance(timestamp, mouse.forward, mouse.yaw, mouse.pitch);
        if let Some(crossing) = self.resampler.last_crossing() {
            self.last_activity = self.last_activity.map(|t| t.max(crossing));
        }

        let count = emitted.len();
        if count > 0 {
            metrics::counter!("spatial_samples_emitted", "modality" => "mouse")
                .increment(count as u64);
        }

        // every emitted sample joins the segment even if a sink write fails
        let sampling_count = self.config.spatial.sampling_count;
        let mut result = Ok(());
        for sample in emitted {
            view.notify("mouse.spatial.yaw", sample.timestamp, sample.yaw);
            view.notify("mouse.spatial.pitch", sample.timestamp, sample.pitch);

            if let Some(oldest) = self.spatial.push(sample) {
                let evicted = sink.append(Destination::MouseSpatialData, &Record::from(oldest));
                result = result.and(evicted);
            }

            if self.spatial.len() > sampling_count {
                let trailing = self.spatial_extractor.extract_mouse(
                    self.spatial.latest(sampling_count),
                    self.segment_id,
                    WindowKind::Trailing,
                );
                view.notify("mouse.efficiency", trailing.end_time, trailing.efficiency);
                let published =
                    publish(sink, Destination::MouseSpatialFeatureData, trailing.into());
                result = result.and(published.map(|f| features.push(f)));
            }
        }

        result.map(|()| count)
    }

    /// Extract and drain the open segment, then advance the segment ID.
    ///
    /// Every sample reaches the sink even when a write fails; the first
    /// failure is returned after the segment is sealed.
    fn seal_segment<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<(), SinkError> {
        let segment = self.spatial_extractor.extract_mouse(
            self.spatial.as_slice(),
            self.segment_id,
            WindowKind::Segment,
        );

        info!(
            "Mouse segment {} closed with {} samples",
            self.segment_id, segment.sample_count
        );
        view.notify("mouse.efficiency", segment.end_time, segment.efficiency);
        view.mark(timestamp, "mouse_segment_closed");

        let mut result = publish(sink, Destination::MouseSpatialFeatureData, segment.into())
            .map(|f| features.push(f));
        for sample in self.spatial.drain() {
            result = result.and(sink.append(Destination::MouseSpatialData, &Record::from(sample)));
        }

        metrics::counter!("segments_closed", "modality" => "mouse").increment(1);
        self.segment_id += 1;
        result
    }

    fn restart_segment(&mut self, timestamp: f64, mouse: &MouseSnapshot) {
        self.resampler.reset(timestamp, mouse.forward);
        self.last_activity = Some(timestamp);
    }

    /// Drop motion history after a recording pause
    pub fn resume(&mut self, timestamp: f64, mouse: &MouseSnapshot) {
        self.motion.clear();
        self.restart_segment(timestamp, mouse);
    }

    /// Close the open segment and drain the temporal window
    pub fn finish<S: Sink, V: LiveView>(
        &mut self,
        timestamp: f64,
        sink: &mut S,
        view: &mut V,
        features: &mut Vec<FeatureRecord>,
    ) -> Result<(), SinkError> {
        let mut result = Ok(());
        if !self.spatial.is_empty() {
            result = self.seal_segment(timestamp, sink, view, features);
        }

        let remaining = self.temporal.len();
        for sample in self.temporal.drain() {
            result = result.and(sink.append(Destination::MouseTemporalData, &Record::from(sample)));
        }
        debug!("Drained {} mouse temporal samples", remaining);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::NullView;
    use crate::test_sinks::FailingSink;
    use sink::MemorySink;
    use telemetry_types::geometry::direction_from_yaw_pitch;

    fn looking(yaw: f64) -> MouseSnapshot {
        MouseSnapshot {
            yaw,
            pitch: 0.0,
            forward: direction_from_yaw_pitch(yaw, 0.0),
            ..Default::default()
        }
    }

    fn small_config() -> MouseConfig {
        let mut config = MouseConfig::default();
        config.resampler.warmup_samples = 0;
        config.temporal_window = 5;
        config
    }

    /// Sweep 4 degrees per tick, one tick every 50 ms
    fn sweep<S: Sink>(
        collector: &mut MouseCollector,
        sink: &mut S,
        features: &mut Vec<FeatureRecord>,
        ticks: usize,
    ) {
        for i in 0..ticks {
            let (t, yaw) = (i as f64 * 0.05, i as f64 * 4.0);
            collector
                .ingest(t, &looking(yaw), sink, &mut NullView, features)
                .unwrap();
        }
    }

    #[test]
    fn test_temporal_window_slides() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        for i in 0..8 {
            collector
                .ingest(i as f64 * 0.1, &looking(0.0), &mut sink, &mut NullView, &mut features)
                .unwrap();
        }

        // window fills on tick 5, then slides three times
        assert_eq!(sink.count(Destination::MouseTemporalFeatureData), 4);
        assert_eq!(sink.count(Destination::MouseTemporalData), 3);
        assert_eq!(collector.temporal_len(), 5);
    }

    #[test]
    fn test_trailing_window_extraction() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        // 0.25 arc = 7.16 degrees
        sweep(&mut collector, &mut sink, &mut features, 40);

        let held = collector.segment_len();
        assert!(held > 10);
        let trailing = features
            .iter()
            .filter(|f| {
                matches!(f, FeatureRecord::MouseSpatial(m) if m.kind == WindowKind::Trailing)
            })
            .count();
        assert_eq!(trailing, held - 10);
        assert_eq!(collector.segment_id(), 0);
    }

    #[test]
    fn test_timeout_closes_segment() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        sweep(&mut collector, &mut sink, &mut features, 10);
        let held = collector.segment_len();
        assert!(held > 0);

        // idle past the timeout
        collector
            .ingest(5.0, &looking(36.0), &mut sink, &mut NullView, &mut features)
            .unwrap();

        assert_eq!(collector.segment_id(), 1);
        assert_eq!(collector.segment_len(), 0);
        assert_eq!(sink.count(Destination::MouseSpatialData), held);
        assert!(features.iter().any(|f| matches!(
            f,
            FeatureRecord::MouseSpatial(m) if m.kind == WindowKind::Segment && m.segment_id == 0
        )));
    }

    #[test]
    fn test_idle_timeout_keeps_id() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        for t in [0.0, 3.0, 6.0, 9.0] {
            collector
                .ingest(t, &looking(0.0), &mut sink, &mut NullView, &mut features)
                .unwrap();
        }
        assert_eq!(collector.segment_id(), 0);
        assert_eq!(sink.count(Destination::MouseSpatialFeatureData), 0);
    }

    #[test]
    fn test_finish_drains_everything() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        sweep(&mut collector, &mut sink, &mut features, 12);
        let held = collector.segment_len();
        collector
            .finish(1.0, &mut sink, &mut NullView, &mut features)
            .unwrap();

        assert_eq!(collector.segment_len(), 0);
        assert_eq!(collector.temporal_len(), 0);
        assert_eq!(sink.count(Destination::MouseSpatialData), held);
        assert_eq!(sink.count(Destination::MouseTemporalData), 12);
    }

    #[test]
    fn test_failed_write_still_drains_segment() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        sweep(&mut collector, &mut sink, &mut features, 10);
        let held = collector.segment_len();
        assert!(held > 1);

        // the segment feature record is the first write and fails
        let mut failing = FailingSink::failing_on(1);
        assert!(collector
            .finish(1.0, &mut failing, &mut NullView, &mut features)
            .is_err());

        assert_eq!(collector.segment_id(), 1);
        assert_eq!(collector.segment_len(), 0);
        assert_eq!(collector.temporal_len(), 0);
        assert_eq!(failing.inner.count(Destination::MouseSpatialFeatureData), 1);
        assert_eq!(failing.inner.count(Destination::MouseSpatialData), held);
        assert_eq!(failing.inner.count(Destination::MouseTemporalData), 5);
    }

    #[test]
    fn test_failed_write_does_not_skip_timeout() {
        let mut collector = MouseCollector::new(small_config());
        let mut sink = MemorySink::new();
        let mut features = Vec::new();

        sweep(&mut collector, &mut sink, &mut features, 10);
        let held = collector.segment_len();

        // the evicted temporal sample is written first and fails
        let mut failing = FailingSink::failing_on(1);
        let result =
            collector.ingest(5.0, &looking(36.0), &mut failing, &mut NullView, &mut features);
        assert!(result.is_err());

        assert_eq!(collector.segment_id(), 1);
        assert_eq!(failing.inner.count(Destination::MouseTemporalData), 1);
        assert_eq!(failing.inner.count(Destination::MouseSpatialData), held);
    }
}
