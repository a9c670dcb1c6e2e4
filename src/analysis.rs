//! Track analysis orchestration
//!
//! Runs the four independent derivations (grade series, climbing segments,
//! cumulative elevation, mile splits) over one track and packages them with
//! the summary scalars. Everything here is pure: no I/O, no shared state.

use crate::climbing::{ClimbDetector, ClimbThresholds};
use crate::elevation::build_cumulative_elevation;
use crate::format::format_pace;
use crate::grade::build_grade_series;
use crate::models::{AnalysisOutcome, AnalyticsResult, Track, TrackSeries};
use crate::splits::build_mile_splits;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

/// Relative disagreement between the reported and recorded distance worth noting
const DISTANCE_MISMATCH_RATIO: f64 = 0.01;

/// Analyzer for recorded tracks
#[derive(Debug, Clone, Default)]
pub struct TrackAnalyzer {
    thresholds: ClimbThresholds,
}

impl TrackAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: ClimbThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClimbThresholds {
        &self.thresholds
    }

    /// Analyze one track, or report why it cannot be analyzed
    #[instrument(skip_all, fields(track = track.name.as_deref().unwrap_or("unnamed")))]
    pub fn analyze(&self, track: &Track) -> AnalysisOutcome {
        let series = match track.series() {
            Ok(series) => series,
            Err(reason) => {
                warn!(%reason, "Analytics unavailable");
                return AnalysisOutcome::Unavailable { reason };
            }
        };

        if let Some(reported) = track.total_distance {
            let recorded = series.total_distance();
            if reported > 0.0 && ((recorded - reported) / reported).abs() > DISTANCE_MISMATCH_RATIO
            {
                debug!(
                    reported,
                    recorded, "Reported distance disagrees with distance series, using series"
                );
            }
        }

        AnalysisOutcome::Available(self.analyze_series(&series))
    }

    /// Analyze already length-checked series
    pub fn analyze_series(&self, series: &TrackSeries<'_>) -> AnalyticsResult {
        let total_time = series.total_time();
        let total_distance = series.total_distance();
        let avg_speed = if total_time > 0.0 {
            total_distance / total_time
        } else {
            0.0
        };

        let result = AnalyticsResult {
            total_time,
            total_distance,
            avg_speed,
            avg_pace: format_pace(avg_speed),
            grade_data: build_grade_series(series),
            climbing_segments: ClimbDetector::new(self.thresholds).detect(series),
            cumulative_elevation: build_cumulative_elevation(series),
            splits: build_mile_splits(series),
        };

        info!(
            samples = series.len(),
            distance_m = result.total_distance,
            time_s = result.total_time,
            climbs = result.climbing_segments.len(),
            splits = result.splits.len(),
            "Track analyzed"
        );

        result
    }

    /// Analyze several independent tracks in parallel, preserving order
    pub fn analyze_batch(&self, tracks: &[Track]) -> Vec<AnalysisOutcome> {
        tracks.par_iter().map(|track| self.analyze(track)).collect()
    }
}

/// Analyze a track with the default climb thresholds
pub fn analyze(track: &Track) -> AnalysisOutcome {
    TrackAnalyzer::new().analyze(track)
}

/// Analyze several tracks in parallel with the default climb thresholds
pub fn analyze_batch(tracks: &[Track]) -> Vec<AnalysisOutcome> {
    TrackAnalyzer::new().analyze_batch(tracks)
}
