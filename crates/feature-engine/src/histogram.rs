//! Relative-frequency histograms

use telemetry_types::geometry::angle_between;
use telemetry_types::{DVec3, KeyCode};

/// Counts divided by their total; all zeros when nothing was counted
pub fn normalize_counts(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    counts
        .iter()
        .map(|&c| if total > 0 { c as f64 / total as f64 } else { 0.0 })
        .collect()
}

/// Number of fixed-width bins covering 0–180 degrees
pub fn turn_bin_count(bin_degrees: f64) -> usize {
    if bin_degrees > 0.0 {
        ((180.0 / bin_degrees).ceil() as usize).max(1)
    } else {
        1
    }
}

/// Histogram of turning angles between directions `k` samples apart,
/// pooled over every lag in `strides`
pub fn turn_angle_histogram(directions: &[DVec3], bin_degrees: f64, strides: &[usize]) -> Vec<f64> {
    let bin_count = turn_bin_count(bin_degrees);
    let mut bins = vec![0usize; bin_count];

    for &k in strides.iter().filter(|&&k| k > 0) {
        for i in k..directions.len() {
            let angle = angle_between(directions[i - k], directions[i]).to_degrees();
            let idx = ((angle / bin_degrees).floor() as usize).min(bin_count - 1);
            bins[idx] += 1;
        }
    }

    normalize_counts(&bins)
}

/// Usage share of each movement key in [`KeyCode::DIRECTIONAL`] order
pub fn directional_key_histogram<I: IntoIterator<Item = KeyCode>>(keys: I) -> Vec<f64> {
    let mut counts = [0usize; KeyCode::DIRECTIONAL.len()];
    for idx in keys.into_iter().filter_map(KeyCode::directional_index) {
        counts[idx] += 1;
    }
    normalize_counts(&counts)
}
