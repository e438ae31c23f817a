//! Concurrent scan-and-aggregate engine
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │    ScanCoordinator      │
//!                     │  - discovery (walkdir)  │
//!                     │  - progress rendering   │
//!                     └───────────┬─────────────┘
//!                                 │ FileTask (bounded queue, fed by feeder thread)
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │  load     │             │  load     │             │  load     │
//! │  min dist │             │  min dist │             │  min dist │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       │                         │                         │
//!       └──────────────┬──────────┴───────────┬─────────────┘
//!                      ▼                      ▼
//!              ┌───────────────┐      ┌───────────────┐
//!              │  Aggregator   │      │  completion   │
//!              │  two minima   │      │  channel      │
//!              └───────────────┘      └───────────────┘
//! ```
//!
//! In sequential mode the coordinator runs the same per-file scan on the
//! calling thread, in discovery order.

pub mod aggregate;
pub mod coordinator;
pub mod discovery;
pub mod file_scan;
pub mod queue;
pub mod sink;
pub mod worker;

pub use aggregate::{Aggregator, BestMatch};
pub use coordinator::{ProgressCounter, ScanCoordinator, ScanReport};
pub use discovery::discover;
pub use file_scan::{nearest_distance, FileScanner};
pub use sink::{OutputLine, OutputSink, ProgressSink, RecordingSink};
pub use worker::ScanStats;

use std::path::PathBuf;

/// Whether a file's nearest point falls within the radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Nearest point at or below the radius
    InRange,
    /// Nearest point beyond the radius
    OutOfRange,
}

impl Classification {
    /// Classify a distance against an inclusive radius
    pub fn of(distance: f64, radius: f64) -> Self {
        if distance <= radius {
            Classification::InRange
        } else {
            Classification::OutOfRange
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::InRange => "Nearest in range",
            Classification::OutOfRange => "Nearest out of range",
        }
    }
}

/// Per-file result of a successful scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Absolute path of the track file
    pub path: PathBuf,

    /// Minimum distance from any point to the target, in meters
    pub distance: f64,

    pub classification: Classification,

    /// Number of points examined
    pub points: usize,
}
