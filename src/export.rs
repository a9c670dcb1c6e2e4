//! Report rendering for analysis outcomes
//!
//! JSON keeps the analysis structure as-is (meters, seconds). The text report
//! states distances in miles and elevations in feet.

use crate::config::OutputSettings;
use crate::error::{ExportError, Result};
use crate::format::{format_duration, meters_to_feet, meters_to_miles};
use crate::models::{AnalysisOutcome, AnalyticsResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One analyzed track together with where it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReport<'a> {
    pub source: &'a str,
    pub name: Option<&'a str>,
    pub analytics: &'a AnalysisOutcome,
}

impl<'a> TrackReport<'a> {
    pub fn new(source: &'a str, name: Option<&'a str>, analytics: &'a AnalysisOutcome) -> Self {
        Self {
            source,
            name,
            analytics,
        }
    }

    /// Heading used by the text report
    pub fn title(&self) -> &'a str {
        self.name.unwrap_or(self.source)
    }
}

/// Serialize any report structure as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::Serialization(e.to_string()).into())
}

/// Export any serializable data structure to a JSON file
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let json_data = to_json(data)?;
    std::fs::write(output_path, json_data).map_err(ExportError::Io)?;
    Ok(())
}

/// Write a human-readable report for one analysis outcome
pub fn write_text_report<W: Write>(
    out: &mut W,
    title: &str,
    outcome: &AnalysisOutcome,
    settings: &OutputSettings,
) -> Result<()> {
    write_outcome(out, title, outcome, settings).map_err(ExportError::Io)?;
    Ok(())
}

fn write_outcome<W: Write>(
    out: &mut W,
    title: &str,
    outcome: &AnalysisOutcome,
    settings: &OutputSettings,
) -> std::io::Result<()> {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.chars().count().max(1)))?;

    match outcome {
        AnalysisOutcome::Unavailable { reason } => {
            writeln!(out, "Analytics not available: {}", reason)?;
        }
        AnalysisOutcome::Available(result) => write_result(out, result, settings)?,
    }

    writeln!(out)?;
    Ok(())
}

fn write_result<W: Write>(
    out: &mut W,
    result: &AnalyticsResult,
    settings: &OutputSettings,
) -> std::io::Result<()> {
    writeln!(
        out,
        "Distance: {:.2} mi",
        meters_to_miles(result.total_distance)
    )?;
    writeln!(out, "Moving time: {}", format_duration(result.total_time))?;
    writeln!(out, "Average pace: {} /mi", result.avg_pace)?;

    if let Some(last) = result.cumulative_elevation.last() {
        writeln!(
            out,
            "Elevation: +{:.0} ft / -{:.0} ft",
            meters_to_feet(last.cumulative_gain),
            meters_to_feet(last.cumulative_loss)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Climbs")?;
    writeln!(out, "------")?;
    if result.climbing_segments.is_empty() {
        writeln!(out, "No sustained climbs detected")?;
    }
    for segment in result.climbing_segments.iter().take(settings.max_segments) {
        writeln!(
            out,
            "#{:<3} {:>6.2}-{:<6.2} mi  +{:>5.0} ft  {:>4.1}%  {}",
            segment.id,
            meters_to_miles(segment.start_distance),
            meters_to_miles(segment.end_distance),
            meters_to_feet(segment.elevation_gain),
            segment.avg_grade,
            format_duration(segment.time)
        )?;
    }
    let hidden = result
        .climbing_segments
        .len()
        .saturating_sub(settings.max_segments);
    if hidden > 0 {
        writeln!(out, "... {} smaller climbs not shown", hidden)?;
    }
    writeln!(out)?;

    writeln!(out, "Splits")?;
    writeln!(out, "------")?;
    for split in &result.splits {
        let marker = if split.partial { " (projected)" } else { "" };
        writeln!(out, "Mile {:<3} {:>8}{}", split.mile, split.pace, marker)?;
    }

    if settings.show_grade_series && !result.grade_data.is_empty() {
        writeln!(out)?;
        writeln!(out, "Grade")?;
        writeln!(out, "-----")?;
        for point in &result.grade_data {
            writeln!(
                out,
                "{:>8.3} mi  {:>6.1}%",
                meters_to_miles(point.distance),
                point.grade
            )?;
        }
    }

    Ok(())
}
