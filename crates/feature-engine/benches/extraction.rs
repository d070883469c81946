//! Feature Extraction Benchmarks
//!
//! Spatial and temporal extraction over window sizes seen during play.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use feature_engine::{SpatialExtractor, TemporalExtractor, WindowKind};
use telemetry_types::geometry::direction_from_yaw_pitch;
use telemetry_types::{
    DVec3, KeyCode, KeyboardSpatialSample, KeyboardTemporalSample, MouseSpatialSample,
    MouseTemporalSample, Segment,
};

fn mouse_spatial(n: usize) -> Vec<MouseSpatialSample> {
    (0..n)
        .map(|i| {
            let yaw = i as f64 * 7.0;
            let pitch = (i as f64 * 0.3).sin() * 20.0;
            let direction = direction_from_yaw_pitch(yaw, pitch);
            MouseSpatialSample {
                timestamp: i as f64 * 0.05,
                position: direction * 2.0,
                yaw,
                pitch,
                direction,
            }
        })
        .collect()
}

fn mouse_temporal(n: usize) -> Vec<MouseTemporalSample> {
    (0..n)
        .map(|i| MouseTemporalSample {
            timestamp: i as f64 / 60.0,
            yaw: i as f64,
            pitch: (i as f64 * 0.1).cos() * 10.0,
            angular_speed: (i % 13) as f64,
            angle: (i as f64 * 17.0) % 360.0 - 180.0,
            position: direction_from_yaw_pitch(i as f64, 0.0),
            left_click_duration: if i % 40 == 0 { 0.1 } else { 0.0 },
            ..Default::default()
        })
        .collect()
}

fn keyboard_temporal(n: usize) -> Vec<KeyboardTemporalSample> {
    (0..n)
        .map(|i| KeyboardTemporalSample {
            timestamp: i as f64 * 0.2,
            key: KeyCode::DIRECTIONAL[i % 8],
            hold_time: if i % 2 == 1 { 0.2 } else { 0.0 },
            seek_time: if i % 2 == 0 { 0.1 } else { 0.0 },
            key_latency2: 0.3,
            key_latency3: 0.5,
        })
        .collect()
}

fn bench_spatial(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_extraction");
    let extractor = SpatialExtractor::default();

    for size in [10usize, 50, 500] {
        let samples = mouse_spatial(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("mouse", size), &samples, |b, s| {
            b.iter(|| extractor.extract_mouse(black_box(s), 0, WindowKind::Segment))
        });

        let segment = Segment::seal(
            0,
            (0..size)
                .map(|i| KeyboardSpatialSample {
                    timestamp: i as f64 * 0.1,
                    position: DVec3::new(i as f64 * 0.1, 0.0, (i as f64 * 0.2).sin()),
                })
                .collect(),
        );
        group.bench_with_input(BenchmarkId::new("keyboard", size), &segment, |b, s| {
            b.iter(|| extractor.extract_keyboard(black_box(s)))
        });
    }

    group.finish();
}

fn bench_temporal(c: &mut Criterion) {
    let mut group = c.benchmark_group("temporal_extraction");
    let extractor = TemporalExtractor::default();

    for size in [60usize, 600] {
        let mouse = mouse_temporal(size);
        let keyboard = keyboard_temporal(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("mouse", size), &mouse, |b, s| {
            b.iter(|| extractor.extract_mouse(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("keyboard", size), &keyboard, |b, s| {
            b.iter(|| extractor.extract_keyboard(black_box(s)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spatial, bench_temporal);
criterion_main!(benches);
