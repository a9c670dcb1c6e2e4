//! Error hierarchy for TrailRS
//!
//! Only the surrounding layers (import, export, configuration) can fail.
//! Track analysis itself never errors: missing data is reported as an
//! unavailable outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all TrailRS operations
#[derive(Debug, Error)]
pub enum TrailError {
    /// Track import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Track import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No importer handles this file
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    Parse { format: String, reason: String },

    /// A cell could not be read as a number
    #[error("Invalid value '{value}' in column {column} on line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

/// Report export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Writing the report failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for TrailRS operations
pub type Result<T> = std::result::Result<T, TrailError>;

impl TrailError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrailError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            TrailError::Import(ImportError::UnsupportedFormat { .. }) => ErrorSeverity::Warning,
            TrailError::Import(_) => ErrorSeverity::Error,
            TrailError::Configuration(_) => ErrorSeverity::Warning,
            TrailError::Io(_) => ErrorSeverity::Critical,
            TrailError::Export(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrailError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find track file: {}", path.display())
            }
            TrailError::Import(ImportError::UnsupportedFormat { format }) => {
                format!(
                    "Track files of type '{}' are not supported. Use .json or .csv.",
                    format
                )
            }
            TrailError::Import(ImportError::InvalidValue { line, column, .. }) => {
                format!(
                    "Track file has an unreadable {} value on line {}.",
                    column, line
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
