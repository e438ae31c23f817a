//! Error types for gpx-nearest
//!
//! This module defines the error hierarchy for:
//! - Directory traversal (fatal, aborts before scanning)
//! - Track file loading (non-fatal, the file is skipped)
//! - Configuration and CLI validation
//! - Worker thread failures
//!
//! Per-file problems never surface as `Err` from the scan itself; they are
//! folded into a [`ScanOutcome`] so sibling files keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the gpx-nearest application
#[derive(Error, Debug)]
pub enum FinderError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Root directory could not be walked
    #[error("Traversal error: {0}")]
    Traversal(#[from] TraversalError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Interrupted by signal
    #[error("Scan interrupted by signal")]
    Interrupted,
}

/// Directory traversal errors
#[derive(Error, Debug)]
pub enum TraversalError {
    /// Root path does not exist
    #[error("Search path not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Root path exists but is not a directory
    #[error("Search path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Root path could not be resolved or read
    #[error("Failed to walk '{path}': {reason}")]
    WalkFailed { path: PathBuf, reason: String },
}

/// Track file loading errors
#[derive(Error, Debug)]
pub enum TrackError {
    /// File could not be opened
    #[error("Failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid GPX
    #[error("Failed to parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl TrackError {
    /// Path of the file that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            TrackError::Io { path, .. } => path,
            TrackError::Parse { path, .. } => path,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Latitude outside [-90, 90]
    #[error("Invalid latitude {value}: must be between -90 and 90")]
    InvalidLatitude { value: f64 },

    /// Longitude outside [-180, 180]
    #[error("Invalid longitude {value}: must be between -180 and 180")]
    InvalidLongitude { value: f64 },

    /// Radius negative or not finite
    #[error("Invalid distance {value}: must be a finite, non-negative number of meters")]
    InvalidRadius { value: f64 },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid file extension
    #[error("Invalid extension '{extension}': must be non-empty")]
    InvalidExtension { extension: String },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },

    /// Feeder thread could not be started or panicked
    #[error("Task feeder failed: {reason}")]
    FeederFailed { reason: String },

    /// Completion count and worker shutdown disagree
    #[error("Scan ended with {completed} of {total} files accounted for")]
    Incomplete { completed: usize, total: usize },
}

/// Result type alias for FinderError
pub type Result<T> = std::result::Result<T, FinderError>;

/// Result type alias for TrackError
pub type TrackResult<T> = std::result::Result<T, TrackError>;

/// Represents the outcome of scanning a single track file
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// File was parsed and had at least one point
    Scored(crate::scanner::ScanResult),

    /// File was parsed but contained no track points
    Empty { path: PathBuf },

    /// File could not be loaded
    Skipped { path: PathBuf, reason: String },
}

impl ScanOutcome {
    /// Returns true if this outcome took part in aggregation
    pub fn is_scored(&self) -> bool {
        matches!(self, ScanOutcome::Scored(_))
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanOutcome::Scored(result) => &result.path,
            ScanOutcome::Empty { path } => path,
            ScanOutcome::Skipped { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err = TraversalError::NotFound {
            path: PathBuf::from("/missing"),
        };
        let finder_err: FinderError = err.into();
        assert!(matches!(finder_err, FinderError::Traversal(_)));
        assert!(finder_err.to_string().contains("/missing"));
    }

    #[test]
    fn test_track_error_path() {
        let err = TrackError::Parse {
            path: PathBuf::from("/data/broken.gpx"),
            reason: "unexpected end of file".into(),
        };
        assert_eq!(err.path(), &PathBuf::from("/data/broken.gpx"));
    }

    #[test]
    fn test_outcome_path() {
        let outcome = ScanOutcome::Skipped {
            path: PathBuf::from("/a.gpx"),
            reason: "bad".into(),
        };
        assert!(!outcome.is_scored());
        assert_eq!(outcome.path(), std::path::Path::new("/a.gpx"));
    }
}
