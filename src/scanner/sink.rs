//! Output and progress sinks
//!
//! The scan engine never writes to the terminal directly. Per-file lines,
//! diagnostics and the final nearest-match lines go through [`OutputSink`];
//! completion percentages go through [`ProgressSink`]. The console
//! implementation lives in [`crate::progress`].

use super::{BestMatch, Classification};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// A user-visible line produced by the scan
#[derive(Debug, Clone, PartialEq)]
pub enum OutputLine {
    /// A file's nearest distance (in-range hit, or any file in debug mode)
    Match { distance: f64, path: PathBuf },

    /// A file that could not be used
    Diagnostic(String),

    /// Final aggregated result for one classification
    Nearest {
        classification: Classification,
        best: BestMatch,
    },
}

/// Format a distance/path pair the way every result line shows it
pub fn format_match(distance: f64, path: &std::path::Path) -> String {
    format!("{:8.0} m, {}", distance, path.display())
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputLine::Match { distance, path } => f.write_str(&format_match(*distance, path)),
            OutputLine::Diagnostic(message) => f.write_str(message),
            OutputLine::Nearest {
                classification,
                best,
            } => write!(
                f,
                "{}: {}",
                classification.label(),
                format_match(best.distance, &best.path)
            ),
        }
    }
}

/// Receives user-visible lines; called concurrently from every scan unit
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: OutputLine);
}

/// Receives completion percentages in [0, 100]
pub trait ProgressSink: Send + Sync {
    fn report(&self, percentage: u8);
}

/// Sink that keeps everything in memory, for tests and library callers
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<OutputLine>>,
    progress: Mutex<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines emitted so far
    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All percentages reported so far
    pub fn progress(&self) -> Vec<u8> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn matches(&self) -> Vec<(f64, PathBuf)> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                OutputLine::Match { distance, path } => Some((distance, path)),
                _ => None,
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                OutputLine::Diagnostic(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn emit(&self, line: OutputLine) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, percentage: u8) {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(percentage);
    }
}
