//! Per-mile splits

use crate::format::{format_duration, meters_to_miles};
use crate::models::{Split, TrackSeries};

/// Trailing fractions of a mile at or below this are not reported
pub const MIN_PARTIAL_MILES: f64 = 0.1;

/// Build one split per completed mile, plus a projected partial final mile.
///
/// The scan is greedy: a sample closes at most one mile, so when samples are
/// sparse enough to skip a mile boundary the following boundaries close at
/// later samples. The partial mile's `time` is normalized to a full mile
/// (`elapsed / fraction`) so it compares against the other splits.
pub fn build_mile_splits(series: &TrackSeries<'_>) -> Vec<Split> {
    let mut splits = Vec::new();
    if series.len() < 2 {
        return splits;
    }

    let mut current_mile: u32 = 1;
    let mut last_boundary_time = 0.0;

    for (&distance, &time) in series.distance.iter().zip(series.time) {
        if meters_to_miles(distance) >= f64::from(current_mile) {
            let split_time = time - last_boundary_time;
            splits.push(Split {
                mile: current_mile,
                time: split_time,
                pace: format_duration(split_time),
                partial: false,
            });
            last_boundary_time = time;
            current_mile += 1;
        }
    }

    let total_miles = meters_to_miles(series.total_distance());
    let partial_distance = total_miles - splits.len() as f64;
    if partial_distance > MIN_PARTIAL_MILES {
        let partial_time = series.total_time() - last_boundary_time;
        let normalized = partial_time / partial_distance;
        splits.push(Split {
            mile: current_mile,
            time: normalized,
            pace: format_duration(normalized),
            partial: true,
        });
    }

    splits
}
