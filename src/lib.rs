// Library interface for TrailRS modules
// Track analytics: grade, climbing segments, cumulative elevation and mile splits

pub mod analysis;
pub mod cache;
pub mod climbing;
pub mod config;
pub mod elevation;
pub mod error;
pub mod export;
pub mod format;
pub mod grade;
pub mod import;
pub mod logging;
pub mod models;
pub mod splits;

// Re-export commonly used types for convenience
pub use models::*;
pub use analysis::{analyze, analyze_batch, TrackAnalyzer};
pub use cache::{AnalysisCache, TrackFingerprint};
pub use climbing::{ClimbDetector, ClimbState, ClimbThresholds};
pub use config::{AppConfig, ReportFormat};
pub use error::{TrailError, Result};
pub use import::{ImportManager, TrackImporter};
pub use logging::{LogConfig, LogLevel, LogFormat};
