//! Configuration types for gpx-nearest
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - A builder-style constructor for library callers

use crate::error::ConfigError;
use crate::track::{Coordinate, DistanceMetric};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Minimum task queue size
const MIN_QUEUE_SIZE: usize = 1;

/// Default in-range radius in meters
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// Default track file extension
pub const DEFAULT_EXTENSION: &str = "gpx";

/// Find the GPX tracks that pass closest to a coordinate
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gpx-nearest",
    version,
    about = "Find the GPX tracks that pass closest to a coordinate",
    long_about = "Scans a directory tree for GPX files and measures how close each track comes \
                  to a target coordinate.\n\n\
                  Every file whose nearest point lies within --dist meters is printed as it is \
                  found. At the end the nearest file within range and the nearest file out of \
                  range are reported.",
    after_help = "EXAMPLES:\n    \
        gpx-nearest --lat 47.3769 --lon 8.5417 --path ~/tracks\n    \
        gpx-nearest --lat 47.3769 --lon 8.5417 --dist 250 --path ~/tracks --debug\n    \
        gpx-nearest --lat -33.8568 --lon 151.2153 --sequential --warnings"
)]
pub struct CliArgs {
    /// Latitude of target (North to South)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "DEG")]
    pub lat: f64,

    /// Longitude of target (East to West)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "DEG")]
    pub lon: f64,

    /// Distance between target and track point in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_M, value_name = "METERS")]
    pub dist: f64,

    /// Directory containing the GPX files
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub path: PathBuf,

    /// Scan files one at a time in discovery order
    #[arg(long)]
    pub sequential: bool,

    /// Number of worker threads for concurrent scanning
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Task queue size between the feeder and the workers
    #[arg(long, default_value = "256", value_name = "NUM")]
    pub queue_size: usize,

    /// Debug mode (print out all file distances)
    #[arg(long)]
    pub debug: bool,

    /// Warn about files without any track points
    #[arg(long)]
    pub warnings: bool,

    /// Distance metric
    #[arg(long, value_enum, default_value_t = DistanceMetric::Planar)]
    pub metric: DistanceMetric,

    /// Track file extension to look for
    #[arg(long, default_value = DEFAULT_EXTENSION, value_name = "EXT")]
    pub extension: String,

    /// Exclude paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth (unlimited if not set)
    #[arg(short = 'd', long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// Quiet mode - suppress header and progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (log scan statistics and skipped entries)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    // Parsing and distance math are CPU bound
    num_cpus::get().clamp(1, MAX_WORKERS)
}

/// How files are dispatched, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Bounded worker pool, no ordering between files
    Concurrent { workers: usize },

    /// One file at a time in discovery order
    Sequential,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Coordinate all distances are measured against
    pub target: Coordinate,

    /// In-range threshold in meters (inclusive)
    pub radius: f64,

    /// Root of the search
    pub root: PathBuf,

    /// Dispatch mode
    pub mode: ScanMode,

    /// Task queue capacity
    pub queue_size: usize,

    /// Print every file's distance
    pub debug: bool,

    /// Print a diagnostic for files without points
    pub warnings: bool,

    /// Distance metric
    pub metric: DistanceMetric,

    /// Track file extension (without the dot, matched case-insensitively)
    pub extension: String,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Maximum traversal depth
    pub max_depth: Option<usize>,

    /// Show header and progress line
    pub show_progress: bool,
}

impl ScanConfig {
    /// Configuration with defaults for everything but target and radius
    pub fn new(target: Coordinate, radius: f64) -> Self {
        Self {
            target,
            radius,
            root: PathBuf::from("."),
            mode: ScanMode::Concurrent {
                workers: default_workers(),
            },
            queue_size: 256,
            debug: false,
            warnings: false,
            metric: DistanceMetric::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            exclude_patterns: Vec::new(),
            max_depth: None,
            show_progress: false,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Check target and radius
    ///
    /// `new` and the `with_*` builders do not validate; the coordinator calls
    /// this before every scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Coordinate {
            latitude,
            longitude,
        } = self.target;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLatitude { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidLongitude { value: longitude });
        }

        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ConfigError::InvalidRadius { value: self.radius });
        }

        if let ScanMode::Concurrent { workers } = self.mode {
            if workers == 0 || workers > MAX_WORKERS {
                return Err(ConfigError::InvalidWorkerCount {
                    count: workers,
                    max: MAX_WORKERS,
                });
            }
        }

        Ok(())
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let target = Coordinate::new(args.lat, args.lon);

        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        let queue_size = args.queue_size.max(MIN_QUEUE_SIZE);

        let extension = args.extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(ConfigError::InvalidExtension {
                extension: args.extension,
            });
        }

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mode = if args.sequential {
            ScanMode::Sequential
        } else {
            ScanMode::Concurrent {
                workers: args.workers,
            }
        };

        let config = Self {
            target,
            radius: args.dist,
            root: args.path,
            mode,
            queue_size,
            debug: args.debug,
            warnings: args.warnings,
            metric: args.metric,
            extension,
            exclude_patterns,
            max_depth: args.max_depth,
            show_progress: !args.quiet,
        };
        config.validate()?;

        Ok(config)
    }

    /// Check if a path should be excluded
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_patterns.iter().any(|re| re.is_match(path))
    }

    /// Number of threads that will scan files
    pub fn worker_count(&self) -> usize {
        match self.mode {
            ScanMode::Concurrent { workers } => workers,
            ScanMode::Sequential => 1,
        }
    }
}
