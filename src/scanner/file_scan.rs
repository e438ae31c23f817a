//! Per-file scan: load, reduce to the nearest point, classify, aggregate
//!
//! A [`FileScanner`] is shared by every worker. It owns no mutable state of
//! its own; the only cross-file state it touches is the [`Aggregator`].

use super::sink::{OutputLine, OutputSink};
use super::{Aggregator, Classification, ScanResult};
use crate::error::ScanOutcome;
use crate::track::{Coordinate, DistanceOracle, TrackLoader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Minimum distance from any point to `target`
///
/// Scans the whole sequence; point order says nothing about distance.
/// Returns `None` for an empty sequence.
pub fn nearest_distance<'a, I>(
    points: I,
    target: &Coordinate,
    oracle: &dyn DistanceOracle,
) -> Option<f64>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    points
        .into_iter()
        .map(|point| oracle.distance(point, target))
        .fold(None, |best, d| match best {
            Some(b) if b <= d => Some(b),
            _ => Some(d),
        })
}

/// Scans single track files against a fixed target
#[derive(Clone)]
pub struct FileScanner {
    target: Coordinate,
    radius: f64,
    debug: bool,
    warnings: bool,
    loader: Arc<dyn TrackLoader>,
    oracle: Arc<dyn DistanceOracle>,
    aggregator: Arc<Aggregator>,
    output: Arc<dyn OutputSink>,
}

impl FileScanner {
    pub fn new(
        target: Coordinate,
        radius: f64,
        loader: Arc<dyn TrackLoader>,
        oracle: Arc<dyn DistanceOracle>,
        aggregator: Arc<Aggregator>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            target,
            radius,
            debug: false,
            warnings: false,
            loader,
            oracle,
            aggregator,
            output,
        }
    }

    /// Print every file's distance, not only in-range hits
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Print a diagnostic for files with no points
    pub fn warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.aggregator
    }

    /// Scan one file end-to-end
    ///
    /// Load failures and empty files are reported and returned as outcomes;
    /// they never touch the aggregator.
    pub fn scan_one(&self, path: &Path) -> ScanOutcome {
        let track_file = match self.loader.load(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Track file skipped");
                self.output.emit(OutputLine::Diagnostic(format!(
                    "Error while parsing the file: {}",
                    path.display()
                )));
                return ScanOutcome::Skipped {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
            }
        };

        let nearest = nearest_distance(track_file.points(), &self.target, self.oracle.as_ref());
        let distance = match nearest {
            Some(distance) => distance,
            None => {
                if self.warnings {
                    self.output.emit(OutputLine::Diagnostic(format!(
                        "No track points in file: {}",
                        path.display()
                    )));
                }
                return ScanOutcome::Empty {
                    path: path.to_path_buf(),
                };
            }
        };

        let points = track_file.point_count();
        let result = ScanResult {
            path: track_file.path,
            distance,
            classification: Classification::of(distance, self.radius),
            points,
        };

        // One line per file: debug mode covers every file, otherwise only hits
        if self.debug || result.classification == Classification::InRange {
            self.output.emit(OutputLine::Match {
                distance: result.distance,
                path: result.path.clone(),
            });
        }

        self.aggregator.update(&result);

        trace!(
            path = %result.path.display(),
            distance = result.distance,
            points = result.points,
            "File scanned"
        );

        ScanOutcome::Scored(result)
    }
}
