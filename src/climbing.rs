//! Climbing segment detection
//!
//! Scans a track once and groups consecutive climbing steps into sustained
//! climbs. Short interruptions (false flats, small dips) are tolerated up to
//! a grace distance so a long climb is not fragmented; once an interruption
//! outlasts the grace distance the climb is closed at its last climbing
//! sample, excluding the flat tail.
//!
//! The scan is an explicit state machine over [`ClimbState`], driven one
//! step at a time by [`ClimbState::step`].

use crate::grade::step_grade;
use crate::models::{ClimbingSegment, TrackSeries};
use tracing::debug;

/// Thresholds used to classify steps and accept climbs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbThresholds {
    /// Grade in percent at or above which a step counts as climbing
    pub min_grade: f64,
    /// Minimum horizontal length in meters for a climb to be kept
    pub min_distance: f64,
    /// Longest interruption in meters tolerated inside a climb
    pub grace_distance: f64,
}

impl ClimbThresholds {
    pub const DEFAULT: ClimbThresholds = ClimbThresholds {
        min_grade: 2.0,
        min_distance: 400.0,
        grace_distance: 200.0,
    };
}

impl Default for ClimbThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a climb started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbStart {
    pub index: usize,
    pub elevation: f64,
    pub time: f64,
}

/// Detector state between two steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimbState {
    /// No climb in progress
    NoSegment,
    /// Climbing, most recent step was a climbing step
    ClimbingOpen {
        start: ClimbStart,
        last_climbing: usize,
    },
    /// Climb open but currently interrupted since sample `flat_start`
    ClimbingOpenWithInterruption {
        start: ClimbStart,
        last_climbing: usize,
        flat_start: usize,
    },
}

/// A climb that has ended and still has to pass evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedClimb {
    pub start: ClimbStart,
    pub end: usize,
}

impl ClimbState {
    /// Advance the state machine over the step ending at sample `i`.
    ///
    /// `grade` is the step grade, `None` for steps where the distance did not
    /// advance (those count as non-climbing). Returns the next state and the
    /// climb that was closed by this step, if any. A step index outside
    /// `1..series.len()` names no step and leaves the state unchanged.
    pub fn step(
        self,
        series: &TrackSeries<'_>,
        i: usize,
        grade: Option<f64>,
        thresholds: &ClimbThresholds,
    ) -> (ClimbState, Option<ClosedClimb>) {
        if i == 0 || i >= series.len() {
            return (self, None);
        }

        let climbing = grade.map_or(false, |g| g >= thresholds.min_grade);

        if climbing {
            let start = match self {
                ClimbState::NoSegment => ClimbStart {
                    index: i - 1,
                    elevation: series.elevation[i - 1],
                    time: series.time[i - 1],
                },
                ClimbState::ClimbingOpen { start, .. }
                | ClimbState::ClimbingOpenWithInterruption { start, .. } => start,
            };
            return (
                ClimbState::ClimbingOpen {
                    start,
                    last_climbing: i,
                },
                None,
            );
        }

        let (start, last_climbing, flat_start) = match self {
            ClimbState::NoSegment => return (ClimbState::NoSegment, None),
            ClimbState::ClimbingOpen {
                start,
                last_climbing,
            } => (start, last_climbing, i - 1),
            ClimbState::ClimbingOpenWithInterruption {
                start,
                last_climbing,
                flat_start,
            } => (start, last_climbing, flat_start),
        };

        let flat_distance = series.distance[i] - series.distance[flat_start];
        if flat_distance >= thresholds.grace_distance {
            (
                ClimbState::NoSegment,
                Some(ClosedClimb {
                    start,
                    end: last_climbing,
                }),
            )
        } else {
            (
                ClimbState::ClimbingOpenWithInterruption {
                    start,
                    last_climbing,
                    flat_start,
                },
                None,
            )
        }
    }

    /// Close whatever is still open once the track has ended
    pub fn finish(self, last_index: usize) -> Option<ClosedClimb> {
        match self {
            ClimbState::NoSegment => None,
            ClimbState::ClimbingOpen { start, .. } => Some(ClosedClimb {
                start,
                end: last_index,
            }),
            ClimbState::ClimbingOpenWithInterruption {
                start,
                last_climbing,
                ..
            } => Some(ClosedClimb {
                start,
                end: last_climbing,
            }),
        }
    }
}

/// Stateful detector that assigns ids to accepted climbs
#[derive(Debug)]
pub struct ClimbDetector {
    thresholds: ClimbThresholds,
    next_id: u32,
    segments: Vec<ClimbingSegment>,
}

impl ClimbDetector {
    pub fn new(thresholds: ClimbThresholds) -> Self {
        Self {
            thresholds,
            next_id: 1,
            segments: Vec::new(),
        }
    }

    /// Detect climbs over the whole track, largest elevation gain first
    pub fn detect(mut self, series: &TrackSeries<'_>) -> Vec<ClimbingSegment> {
        if series.len() < 2 {
            return Vec::new();
        }

        let mut state = ClimbState::NoSegment;
        for i in 1..series.len() {
            let grade = step_grade(series, i);
            let (next, closed) = state.step(series, i, grade, &self.thresholds);
            if let Some(climb) = closed {
                self.evaluate(series, climb);
            }
            state = next;
        }

        if let Some(climb) = state.finish(series.len() - 1) {
            self.evaluate(series, climb);
        }

        // Stable sort keeps detection order among equal gains
        self.segments
            .sort_by(|a, b| b.elevation_gain.total_cmp(&a.elevation_gain));
        self.segments
    }

    /// Emit the climb if it is long enough and actually gains elevation
    fn evaluate(&mut self, series: &TrackSeries<'_>, climb: ClosedClimb) {
        let ClosedClimb { start, end } = climb;
        let segment_distance = series.distance[end] - series.distance[start.index];

        if segment_distance < self.thresholds.min_distance {
            debug!(
                start = start.index,
                end,
                distance = segment_distance,
                "Climb rejected: too short"
            );
            return;
        }

        let elevation_gain = series.elevation[end] - start.elevation;
        let avg_grade = elevation_gain / segment_distance * 100.0;

        if elevation_gain <= 0.0 || avg_grade <= 0.0 {
            debug!(
                start = start.index,
                end,
                gain = elevation_gain,
                "Climb rejected: no net gain"
            );
            return;
        }

        let segment = ClimbingSegment {
            id: self.next_id,
            start_distance: series.distance[start.index],
            end_distance: series.distance[end],
            start_elevation: start.elevation,
            end_elevation: series.elevation[end],
            elevation_gain,
            distance: segment_distance,
            avg_grade,
            time: series.time[end] - start.time,
        };
        self.next_id += 1;

        debug!(
            id = segment.id,
            distance = segment.distance,
            gain = segment.elevation_gain,
            avg_grade = segment.avg_grade,
            "Climb detected"
        );
        self.segments.push(segment);
    }
}

/// Detect climbing segments with the default thresholds
pub fn detect_climbing_segments(series: &TrackSeries<'_>) -> Vec<ClimbingSegment> {
    ClimbDetector::new(ClimbThresholds::DEFAULT).detect(series)
}
