//! Track import from JSON and CSV files
//!
//! Reading a track is the job of the activity record, not of the analysis.
//! These importers turn a file into a [`Track`] and nothing more; a file
//! without one of the series yields a track with that series absent.

use crate::error::{ImportError, Result};
use crate::models::Track;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Trait for importing tracks from different file formats
pub trait TrackImporter: Send + Sync {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Read a track from any reader
    fn import_reader(&self, reader: &mut dyn Read) -> Result<Track>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;

    /// Import a track from the file
    fn import_file(&self, file_path: &Path) -> Result<Track> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound {
                path: file_path.to_path_buf(),
            }
            .into());
        }

        let mut file = File::open(file_path)?;
        let mut track = self.import_reader(&mut file)?;
        if track.name.is_none() {
            track.name = file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string);
        }
        Ok(track)
    }
}

fn has_extension(file_path: &Path, extensions: &[&str]) -> bool {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// JSON importer for the activity record shape
///
/// Expects an object with `distance`, `elevation` (or `altitude`) and `time`
/// arrays, plus optional `gain`, `totalDistance` and `name`.
#[derive(Debug, Default)]
pub struct JsonTrackImporter;

impl JsonTrackImporter {
    pub fn new() -> Self {
        Self
    }
}

impl TrackImporter for JsonTrackImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, &["json"])
    }

    fn import_reader(&self, reader: &mut dyn Read) -> Result<Track> {
        let track: Track = serde_json::from_reader(reader).map_err(|e| ImportError::Parse {
            format: self.format_name().to_string(),
            reason: e.to_string(),
        })?;
        Ok(track)
    }

    fn format_name(&self) -> &'static str {
        "JSON"
    }
}

/// Column of a track CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TrackColumn {
    Distance,
    Elevation,
    Time,
}

/// CSV importer with flexible column names, one sample per row
pub struct CsvTrackImporter {
    column_mapping: HashMap<String, TrackColumn>,
}

impl Default for CsvTrackImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTrackImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(
            &mut column_mapping,
            TrackColumn::Distance,
            &["distance", "dist", "distance_m", "cumulative_distance"],
        );
        Self::add_mapping(
            &mut column_mapping,
            TrackColumn::Elevation,
            &["elevation", "altitude", "alt", "elev", "elevation_m"],
        );
        Self::add_mapping(
            &mut column_mapping,
            TrackColumn::Time,
            &["time", "elapsed", "elapsed_time", "timestamp", "time_s"],
        );

        Self { column_mapping }
    }

    fn add_mapping(
        mapping: &mut HashMap<String, TrackColumn>,
        column: TrackColumn,
        variations: &[&str],
    ) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), column);
        }
    }
}

impl TrackImporter for CsvTrackImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, &["csv"])
    }

    fn import_reader(&self, reader: &mut dyn Read) -> Result<Track> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ImportError::Parse {
                format: self.format_name().to_string(),
                reason: e.to_string(),
            })?
            .clone();

        // Column index for every recognized header, first match wins
        let mut positions: Vec<(usize, TrackColumn, String)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = self.column_mapping.get(&header.to_lowercase()) {
                if positions.iter().all(|(_, c, _)| c != column) {
                    positions.push((idx, *column, header.to_string()));
                }
            }
        }
        debug!(columns = ?positions, "CSV columns mapped");

        let mut values: HashMap<TrackColumn, Vec<f64>> = positions
            .iter()
            .map(|(_, column, _)| (*column, Vec::new()))
            .collect();

        for record in csv_reader.records() {
            let record = record.map_err(|e| ImportError::Parse {
                format: self.format_name().to_string(),
                reason: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            for (idx, column, header) in &positions {
                let raw = record.get(*idx).unwrap_or("");
                let value: f64 = raw.parse().map_err(|_| ImportError::InvalidValue {
                    line,
                    column: header.clone(),
                    value: raw.to_string(),
                })?;
                if let Some(series) = values.get_mut(column) {
                    series.push(value);
                }
            }
        }

        Ok(Track {
            name: None,
            distance: values.remove(&TrackColumn::Distance),
            elevation: values.remove(&TrackColumn::Elevation),
            time: values.remove(&TrackColumn::Time),
            gain: None,
            total_distance: None,
        })
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Manager for coordinating the track importers
pub struct ImportManager {
    importers: Vec<Box<dyn TrackImporter>>,
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn TrackImporter>> = vec![
            Box::new(JsonTrackImporter::new()),
            Box::new(CsvTrackImporter::new()),
        ];

        Self { importers }
    }

    /// Import a single file, choosing the importer by extension
    pub fn import_file(&self, file_path: &Path) -> Result<Track> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportError::UnsupportedFormat {
                format: file_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?;

        info!(
            file = %file_path.display(),
            format = importer.format_name(),
            "Importing track"
        );
        importer.import_file(file_path)
    }
}
