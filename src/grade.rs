//! Per-step grade series

use crate::format::clamp;
use crate::models::{GradePoint, TrackSeries};

/// Grades beyond this magnitude are treated as elevation spikes and clamped
pub const MAX_GRADE: f64 = 50.0;

/// Grade in percent between samples `i - 1` and `i`, clamped to ±[`MAX_GRADE`].
///
/// Returns `None` when the distance did not advance (stationary or
/// out-of-order samples), since no grade can be computed there.
pub fn step_grade(series: &TrackSeries<'_>, i: usize) -> Option<f64> {
    if i == 0 || i >= series.len() {
        return None;
    }

    let dist_change = series.distance[i] - series.distance[i - 1];
    if dist_change <= 0.0 {
        return None;
    }

    let elev_change = series.elevation[i] - series.elevation[i - 1];
    Some(clamp(elev_change / dist_change * 100.0, -MAX_GRADE, MAX_GRADE))
}

/// Build one [`GradePoint`] per sample pair whose distance advanced
pub fn build_grade_series(series: &TrackSeries<'_>) -> Vec<GradePoint> {
    (1..series.len())
        .filter_map(|i| {
            step_grade(series, i).map(|grade| GradePoint {
                distance: series.distance[i],
                grade,
            })
        })
        .collect()
}
