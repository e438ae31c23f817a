//! gpx-nearest - find the GPX tracks that pass closest to a coordinate
//!
//! Scans a directory tree of GPX files and measures, for every file, how close
//! its nearest track point comes to a target coordinate. Files within a radius
//! are reported as they are found; at the end the single nearest file within
//! the radius and the single nearest file beyond it are reported.
//!
//! # Features
//!
//! - **Exhaustive scan**: every point of every file is measured; there is no
//!   spatial index to go stale.
//!
//! - **Parallel Scanning**: a bounded pool of worker threads, or a strictly
//!   sequential pass in discovery order. Both give identical results.
//!
//! - **Deterministic results**: equal distances resolve to the
//!   lexicographically smaller path, whatever order files finish in.
//!
//! - **Fault tolerant**: unreadable and empty files are reported and counted
//!   but never stop the scan.
//!
//! # Example
//!
//! ```bash
//! # Tracks passing within 1 km of Zurich main station
//! gpx-nearest --lat 47.3779 --lon 8.5403 --path ~/tracks
//!
//! # Every file's distance, one file at a time
//! gpx-nearest --lat 47.3779 --lon 8.5403 --path ~/tracks --debug --sequential
//! ```

pub mod config;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod track;

pub use config::{CliArgs, ScanConfig, ScanMode};
pub use error::{FinderError, Result, ScanOutcome};
pub use scanner::{Aggregator, BestMatch, Classification, ScanCoordinator, ScanReport, ScanResult};
pub use track::{Coordinate, DistanceMetric, DistanceOracle, GpxLoader, TrackFile, TrackLoader};
