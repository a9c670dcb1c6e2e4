//! Cumulative elevation gain and loss
//!
//! Every elevation delta counts, however small. This is total vertical
//! relief traversed, which is a different question from the climbs found by
//! [`crate::climbing`], so the two are kept separate.

use crate::models::{CumulativeElevationPoint, TrackSeries};

/// Build one point per sample with running gain and loss totals
pub fn build_cumulative_elevation(series: &TrackSeries<'_>) -> Vec<CumulativeElevationPoint> {
    let mut points = Vec::with_capacity(series.len());
    let mut cumulative_gain = 0.0;
    let mut cumulative_loss = 0.0;

    for i in 0..series.len() {
        if i > 0 {
            let change = series.elevation[i] - series.elevation[i - 1];
            if change > 0.0 {
                cumulative_gain += change;
            } else {
                cumulative_loss += change.abs();
            }
        }

        points.push(CumulativeElevationPoint {
            distance: series.distance[i],
            elevation: series.elevation[i],
            cumulative_gain,
            cumulative_loss,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cumulative(elevation: &[f64]) -> Vec<CumulativeElevationPoint> {
        let distance: Vec<f64> = (0..elevation.len()).map(|i| i as f64 * 25.0).collect();
        let time: Vec<f64> = (0..elevation.len()).map(|i| i as f64 * 5.0).collect();
        let series = TrackSeries::new(&distance, elevation, &time).unwrap();
        build_cumulative_elevation(&series)
    }

    #[test]
    fn test_gain_and_loss() {
        let points = cumulative(&[100.0, 110.0, 105.0, 105.0, 120.0]);

        assert_eq!(points.len(), 5);
        assert_eq!(points[0].cumulative_gain, 0.0);
        assert_eq!(points[0].cumulative_loss, 0.0);
        assert_eq!(points[1].cumulative_gain, 10.0);
        assert_eq!(points[2].cumulative_loss, 5.0);
        assert_eq!(points[4].cumulative_gain, 25.0);
        assert_eq!(points[4].cumulative_loss, 5.0);
        assert_eq!(points[4].distance, 100.0);
        assert_eq!(points[4].elevation, 120.0);
    }

    #[test]
    fn test_tiny_changes_still_count() {
        let points = cumulative(&[0.0, 0.01, 0.0]);

        assert!((points[2].cumulative_gain - 0.01).abs() < 1e-12);
        assert!((points[2].cumulative_loss - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(cumulative(&[]).is_empty());

        let single = cumulative(&[250.0]);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].cumulative_gain, 0.0);
        assert_eq!(single[0].cumulative_loss, 0.0);
    }

    proptest! {
        #[test]
        fn test_monotonic_and_closed(
            elevation in prop::collection::vec(-500.0f64..4000.0, 1..300)
        ) {
            let points = cumulative(&elevation);

            for pair in points.windows(2) {
                prop_assert!(pair[0].cumulative_gain <= pair[1].cumulative_gain);
                prop_assert!(pair[0].cumulative_loss <= pair[1].cumulative_loss);
            }

            let last = &points[points.len() - 1];
            let net = elevation[elevation.len() - 1] - elevation[0];
            prop_assert!((last.cumulative_gain - last.cumulative_loss - net).abs() < 1e-6);
        }
    }
}
