use trailrs::format::METERS_PER_MILE;
use trailrs::{analyze, AnalysisOutcome, SeriesKind, Track, UnavailableReason};

/// Integration tests for complete track analysis workflows

#[cfg(test)]
mod analysis_tests {
    use super::*;

    /// Track built from (length m, grade %) legs, sampled every 10 m at `speed` m/s
    fn legs_track(legs: &[(f64, f64)], speed: f64) -> Track {
        let mut distance = vec![0.0];
        let mut elevation = vec![250.0];
        let mut time = vec![0.0];

        for &(length, grade) in legs {
            let steps = (length / 10.0).round() as usize;
            for _ in 0..steps {
                let d = distance[distance.len() - 1] + 10.0;
                let e = elevation[elevation.len() - 1] + grade / 10.0;
                distance.push(d);
                elevation.push(e);
                time.push(d / speed);
            }
        }

        Track::new(distance, elevation, time)
    }

    fn available(track: &Track) -> trailrs::AnalyticsResult {
        match analyze(track) {
            AnalysisOutcome::Available(result) => result,
            AnalysisOutcome::Unavailable { reason } => panic!("unavailable: {}", reason),
        }
    }

    /// Grace hysteresis: a 150 m flat inside a climb keeps it whole
    #[test]
    fn test_short_interruption_single_climb() {
        let result = available(&legs_track(&[(1000.0, 5.0), (150.0, 0.0), (1000.0, 5.0)], 3.0));

        assert_eq!(result.climbing_segments.len(), 1);
        let climb = &result.climbing_segments[0];
        assert!((climb.distance - 2150.0).abs() < 1e-9);
        assert!((climb.elevation_gain - 100.0).abs() < 1e-6);
    }

    /// Grace hysteresis: a 250 m flat ends the first climb
    #[test]
    fn test_long_interruption_two_climbs() {
        let result = available(&legs_track(&[(1000.0, 5.0), (250.0, 0.0), (1000.0, 5.0)], 3.0));

        assert_eq!(result.climbing_segments.len(), 2);
        for climb in &result.climbing_segments {
            assert!((climb.distance - 1000.0).abs() < 1e-9);
        }
    }

    /// A 250 m flat after a climb that is itself too short leaves only the second
    #[test]
    fn test_long_interruption_after_short_climb() {
        let result = available(&legs_track(&[(300.0, 5.0), (250.0, 0.0), (1000.0, 5.0)], 3.0));

        assert_eq!(result.climbing_segments.len(), 1);
        assert_eq!(result.climbing_segments[0].id, 1);
        assert_eq!(result.climbing_segments[0].start_distance, 550.0);
    }

    #[test]
    fn test_short_climb_rejected() {
        let result = available(&legs_track(&[(300.0, 5.0)], 3.0));
        assert!(result.climbing_segments.is_empty());
    }

    #[test]
    fn test_trailing_descent_excluded_from_climb() {
        // The descent drops below the climb's start but never reaches the grace
        // distance; the climb still ends at its last climbing sample
        let result = available(&legs_track(&[(500.0, 3.0), (190.0, -20.0)], 3.0));

        assert_eq!(result.climbing_segments.len(), 1);
        assert_eq!(result.climbing_segments[0].end_distance, 500.0);
        assert!(result.climbing_segments[0].elevation_gain > 0.0);
    }

    #[test]
    fn test_ids_reflect_detection_order_after_sorting() {
        let result = available(&legs_track(
            &[
                (600.0, 3.0),
                (400.0, -1.0),
                (1200.0, 8.0),
                (400.0, 0.0),
                (700.0, 5.0),
            ],
            3.0,
        ));

        let gains: Vec<f64> = result
            .climbing_segments
            .iter()
            .map(|s| s.elevation_gain)
            .collect();
        assert!(gains.windows(2).all(|w| w[0] >= w[1]));

        let ids: Vec<u32> = result.climbing_segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let mut detection_order = result.climbing_segments.clone();
        detection_order.sort_by_key(|s| s.id);
        assert!(detection_order
            .windows(2)
            .all(|w| w[0].start_distance < w[1].start_distance));
    }

    #[test]
    fn test_cumulative_closure_on_rolling_track() {
        let track = legs_track(
            &[
                (800.0, 4.0),
                (300.0, -6.0),
                (500.0, 2.5),
                (1200.0, -3.0),
                (400.0, 7.0),
            ],
            2.5,
        );
        let result = available(&track);
        let elevation = track.elevation.as_ref().unwrap();

        assert_eq!(result.cumulative_elevation.len(), elevation.len());
        let last = result.cumulative_elevation.last().unwrap();
        let net = elevation[elevation.len() - 1] - elevation[0];
        assert!((last.cumulative_gain - last.cumulative_loss - net).abs() < 1e-6);
    }

    #[test]
    fn test_three_mile_uniform_run_has_no_partial() {
        let total = 3.0 * METERS_PER_MILE;
        let mut distance: Vec<f64> = (0..).map(|i| i as f64 * 8.0).take_while(|d| *d < total).collect();
        distance.push(total);
        // 7:30 per mile
        let time: Vec<f64> = distance.iter().map(|d| d / METERS_PER_MILE * 450.0).collect();
        let elevation = vec![30.0; distance.len()];

        let result = available(&Track::new(distance, elevation, time));

        assert_eq!(result.splits.len(), 3);
        assert_eq!(result.avg_pace, "7:30");
        for split in &result.splits {
            // Samples every 8 m land up to ~2.2 s past each mile boundary
            assert!((split.time - 450.0).abs() < 3.0);
        }
    }

    #[test]
    fn test_partial_mile_projection() {
        let total = 3.15 * METERS_PER_MILE;
        let mut distance: Vec<f64> = (0..).map(|i| i as f64 * 8.0).take_while(|d| *d < total).collect();
        distance.push(total);
        let time: Vec<f64> = distance.iter().map(|d| d / METERS_PER_MILE * 450.0).collect();
        let elevation = vec![30.0; distance.len()];
        let total_time = time[time.len() - 1];

        let result = available(&Track::new(distance, elevation, time));

        assert_eq!(result.splits.len(), 4);
        let partial = &result.splits[3];
        assert!(partial.partial);
        assert_eq!(partial.mile, 4);

        let boundary: f64 = result.splits[..3].iter().map(|s| s.time).sum();
        let raw_partial = total_time - boundary;
        assert!(raw_partial < 100.0);
        assert!((partial.time - raw_partial / 0.15).abs() < 0.01);
    }

    #[test]
    fn test_each_missing_series_is_unavailable() {
        let base = legs_track(&[(500.0, 3.0)], 3.0);

        let mut no_distance = base.clone();
        no_distance.distance = None;
        let mut no_elevation = base.clone();
        no_elevation.elevation = None;
        let mut no_time = base;
        no_time.time = None;

        for (track, series) in [
            (no_distance, SeriesKind::Distance),
            (no_elevation, SeriesKind::Elevation),
            (no_time, SeriesKind::Time),
        ] {
            assert_eq!(
                analyze(&track),
                AnalysisOutcome::Unavailable {
                    reason: UnavailableReason::MissingSeries { series }
                }
            );
        }
    }

    #[test]
    fn test_reported_distance_is_not_used() {
        let track = legs_track(&[(1000.0, 0.0)], 4.0).with_summary(Some(0.0), Some(5000.0));
        let result = available(&track);

        assert_eq!(result.total_distance, 1000.0);
        assert_eq!(result.avg_speed, 4.0);
    }
}
