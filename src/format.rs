//! Numeric helpers and display formatting
//!
//! Unit conversions and the duration/pace strings used by reports. These
//! are shared by the split calculator and the orchestration layer.

/// Meters in one statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Feet in one meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Shown instead of a pace when the speed is zero or negative
pub const NO_PACE: &str = "-";

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Clamp a value into `[min, max]`; NaN stays NaN
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// Format seconds as `H:MM:SS`, or `M:SS` when the hour field is zero.
///
/// Fractional seconds are rounded to the nearest second. Negative and
/// non-finite inputs render as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a speed in m/s as minutes:seconds per mile
pub fn format_pace(speed_mps: f64) -> String {
    if !speed_mps.is_finite() || speed_mps <= 0.0 {
        return NO_PACE.to_string();
    }

    let seconds_per_mile = (METERS_PER_MILE / speed_mps).round() as u64;
    format!("{}:{:02}", seconds_per_mile / 60, seconds_per_mile % 60)
}
