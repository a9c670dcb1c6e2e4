use serde::{Deserialize, Serialize};

/// The three parallel series a track is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Distance,
    Elevation,
    Time,
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesKind::Distance => write!(f, "distance"),
            SeriesKind::Elevation => write!(f, "elevation"),
            SeriesKind::Time => write!(f, "time"),
        }
    }
}

/// Recorded activity track as handed over by the activity record
///
/// Every series is optional: an activity recorded without telemetry simply
/// has no series, which makes the analytics unavailable rather than invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Optional display name of the activity
    #[serde(default)]
    pub name: Option<String>,

    /// Cumulative distance in meters, starting at 0
    #[serde(default)]
    pub distance: Option<Vec<f64>>,

    /// Elevation in meters at each sample
    #[serde(default, alias = "altitude")]
    pub elevation: Option<Vec<f64>>,

    /// Elapsed time in seconds since the start, starting at 0
    #[serde(default)]
    pub time: Option<Vec<f64>>,

    /// Total elevation gain reported by the activity record (passthrough)
    #[serde(default)]
    pub gain: Option<f64>,

    /// Total distance reported by the activity record (passthrough)
    #[serde(default)]
    pub total_distance: Option<f64>,
}

impl Track {
    /// Build a track with all three series present
    pub fn new(distance: Vec<f64>, elevation: Vec<f64>, time: Vec<f64>) -> Self {
        Self {
            name: None,
            distance: Some(distance),
            elevation: Some(elevation),
            time: Some(time),
            gain: None,
            total_distance: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_summary(mut self, gain: Option<f64>, total_distance: Option<f64>) -> Self {
        self.gain = gain;
        self.total_distance = total_distance;
        self
    }

    /// Borrow the three series, or report the first one that is absent
    pub fn series(&self) -> Result<TrackSeries<'_>, UnavailableReason> {
        let distance = self
            .distance
            .as_deref()
            .ok_or(UnavailableReason::MissingSeries {
                series: SeriesKind::Distance,
            })?;
        let elevation = self
            .elevation
            .as_deref()
            .ok_or(UnavailableReason::MissingSeries {
                series: SeriesKind::Elevation,
            })?;
        let time = self
            .time
            .as_deref()
            .ok_or(UnavailableReason::MissingSeries {
                series: SeriesKind::Time,
            })?;

        TrackSeries::new(distance, elevation, time)
    }
}

/// Borrowed, length-checked view over the three series of a track
#[derive(Debug, Clone, Copy)]
pub struct TrackSeries<'a> {
    pub distance: &'a [f64],
    pub elevation: &'a [f64],
    pub time: &'a [f64],
}

impl<'a> TrackSeries<'a> {
    /// Wrap three slices, checking that they are aligned
    pub fn new(
        distance: &'a [f64],
        elevation: &'a [f64],
        time: &'a [f64],
    ) -> Result<Self, UnavailableReason> {
        if distance.len() != elevation.len() || distance.len() != time.len() {
            return Err(UnavailableReason::LengthMismatch {
                distance: distance.len(),
                elevation: elevation.len(),
                time: time.len(),
            });
        }
        Ok(Self {
            distance,
            elevation,
            time,
        })
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Final cumulative distance in meters (0 for an empty track)
    pub fn total_distance(&self) -> f64 {
        self.distance.last().copied().unwrap_or(0.0)
    }

    /// Final elapsed time in seconds (0 for an empty track)
    pub fn total_time(&self) -> f64 {
        self.time.last().copied().unwrap_or(0.0)
    }
}

/// Instantaneous grade between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePoint {
    /// Cumulative distance of the later sample in meters
    pub distance: f64,

    /// Grade in percent, clamped to [-50, 50]
    pub grade: f64,
}

/// A detected sustained climb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimbingSegment {
    /// Detection order, starting at 1
    pub id: u32,

    /// Distance at the start of the climb in meters
    pub start_distance: f64,

    /// Distance at the end of the climb in meters
    pub end_distance: f64,

    /// Elevation at the start of the climb in meters
    pub start_elevation: f64,

    /// Elevation at the end of the climb in meters
    pub end_elevation: f64,

    /// Net elevation gained over the climb in meters (always positive)
    pub elevation_gain: f64,

    /// Horizontal length of the climb in meters
    pub distance: f64,

    /// Average grade in percent (always positive, not clamped)
    pub avg_grade: f64,

    /// Elapsed time on the climb in seconds
    pub time: f64,
}

/// Running elevation totals at one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeElevationPoint {
    pub distance: f64,
    pub elevation: f64,
    pub cumulative_gain: f64,
    pub cumulative_loss: f64,
}

/// Elapsed time for one mile of the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    /// Mile number, starting at 1
    pub mile: u32,

    /// Seconds for this mile. For a partial final mile this is the
    /// full-mile-equivalent time, not the raw elapsed time.
    pub time: f64,

    /// `time` rendered as a duration string
    pub pace: String,

    /// Whether this is the projected partial final mile
    #[serde(default)]
    pub partial: bool,
}

/// Complete analytics for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    /// Total moving time in seconds
    pub total_time: f64,

    /// Total distance in meters, taken from the last distance sample
    pub total_distance: f64,

    /// Average speed in meters per second
    pub avg_speed: f64,

    /// Average pace per mile, or "-" when the speed is not positive
    pub avg_pace: String,

    pub grade_data: Vec<GradePoint>,

    /// Climbs ordered by elevation gain, largest first
    pub climbing_segments: Vec<ClimbingSegment>,

    pub cumulative_elevation: Vec<CumulativeElevationPoint>,

    pub splits: Vec<Split>,
}

/// Why a track could not be analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum UnavailableReason {
    /// One of the three series is absent
    MissingSeries { series: SeriesKind },
    /// The series are present but not aligned
    LengthMismatch {
        distance: usize,
        elevation: usize,
        time: usize,
    },
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::MissingSeries { series } => write!(f, "no {} data recorded", series),
            UnavailableReason::LengthMismatch {
                distance,
                elevation,
                time,
            } => write!(
                f,
                "series lengths differ (distance={}, elevation={}, time={})",
                distance, elevation, time
            ),
        }
    }
}

/// Result of analyzing a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum AnalysisOutcome {
    Available(AnalyticsResult),
    Unavailable { reason: UnavailableReason },
}

impl AnalysisOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, AnalysisOutcome::Available(_))
    }

    pub fn result(&self) -> Option<&AnalyticsResult> {
        match self {
            AnalysisOutcome::Available(result) => Some(result),
            AnalysisOutcome::Unavailable { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<AnalyticsResult> {
        match self {
            AnalysisOutcome::Available(result) => Some(result),
            AnalysisOutcome::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_reports_first_missing() {
        let track = Track {
            distance: Some(vec![0.0, 10.0]),
            elevation: None,
            time: None,
            ..Default::default()
        };

        assert_eq!(
            track.series().unwrap_err(),
            UnavailableReason::MissingSeries {
                series: SeriesKind::Elevation
            }
        );
    }

    #[test]
    fn test_series_rejects_misaligned_lengths() {
        let track = Track::new(vec![0.0, 10.0], vec![100.0], vec![0.0, 5.0]);

        assert!(matches!(
            track.series(),
            Err(UnavailableReason::LengthMismatch { elevation: 1, .. })
        ));
    }

    #[test]
    fn test_empty_series_are_available() {
        let track = Track::new(Vec::new(), Vec::new(), Vec::new());
        let series = track.series().unwrap();

        assert!(series.is_empty());
        assert_eq!(series.total_distance(), 0.0);
        assert_eq!(series.total_time(), 0.0);
    }

    #[test]
    fn test_track_json_accepts_altitude_alias() {
        let json = r#"{"distance":[0,5],"altitude":[10,11],"time":[0,2],"totalDistance":5}"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.elevation, Some(vec![10.0, 11.0]));
        assert_eq!(track.total_distance, Some(5.0));
        assert!(track.gain.is_none());
    }
}
