//! Worker thread logic for concurrent scanning
//!
//! Each worker:
//! - Pulls file tasks from the task queue
//! - Runs the shared [`FileScanner`] on each file
//! - Records per-worker statistics
//! - Sends every outcome to the coordinator's completion channel

use super::file_scan::FileScanner;
use super::queue::TaskReceiver;
use crate::error::{ScanOutcome, WorkerError};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Files that produced a distance
    pub files_scanned: AtomicU64,

    /// Track points measured
    pub points_examined: AtomicU64,

    /// Files parsed without any points
    pub empty: AtomicU64,

    /// Files that failed to load
    pub skipped: AtomicU64,
}

impl WorkerStats {
    /// Count one finished file
    pub fn record(&self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Scored(result) => {
                self.files_scanned.fetch_add(1, Ordering::Relaxed);
                self.points_examined
                    .fetch_add(result.points as u64, Ordering::Relaxed);
            }
            ScanOutcome::Empty { .. } => {
                self.empty.fetch_add(1, Ordering::Relaxed);
            }
            ScanOutcome::Skipped { .. } => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            points_examined: self.points_examined.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Totals across all workers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub points_examined: u64,
    pub empty: u64,
    pub skipped: u64,
}

impl ScanStats {
    /// Files accounted for, whatever their outcome
    pub fn files_completed(&self) -> u64 {
        self.files_scanned + self.empty + self.skipped
    }
}

impl std::ops::Add for ScanStats {
    type Output = ScanStats;

    fn add(self, other: ScanStats) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned + other.files_scanned,
            points_examined: self.points_examined + other.points_examined,
            empty: self.empty + other.empty,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// A worker thread that scans files
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        scanner: Arc<FileScanner>,
        queue_rx: TaskReceiver,
        done_tx: Sender<ScanOutcome>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("scanner-{}", id))
            .spawn(move || worker_loop(id, scanner, queue_rx, done_tx, shutdown, stats_clone))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WorkerError::Panicked {
                id: self.id,
                message: "Worker thread panicked".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    scanner: Arc<FileScanner>,
    queue_rx: TaskReceiver,
    done_tx: Sender<ScanOutcome>,
    shutdown: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    while let Some(task) = queue_rx.recv() {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let outcome = scanner.scan_one(&task.path);
        stats.record(&outcome);
        trace!(worker = id, index = task.index, path = %task.path.display(), "File done");

        if done_tx.send(outcome).is_err() {
            // Coordinator is gone; nobody is waiting for the rest
            break;
        }
    }

    debug!(
        worker = id,
        files = stats.files_scanned.load(Ordering::Relaxed),
        skipped = stats.skipped.load(Ordering::Relaxed),
        "Worker shutting down"
    );
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(workers: &[Worker]) -> ScanStats {
    workers
        .iter()
        .map(|worker| worker.stats().snapshot())
        .fold(ScanStats::default(), |acc, s| acc + s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{Classification, ScanResult};
    use std::path::PathBuf;

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record(&ScanOutcome::Scored(ScanResult {
            path: PathBuf::from("/a.gpx"),
            distance: 10.0,
            classification: Classification::InRange,
            points: 120,
        }));
        stats.record(&ScanOutcome::Empty {
            path: PathBuf::from("/b.gpx"),
        });
        stats.record(&ScanOutcome::Skipped {
            path: PathBuf::from("/c.gpx"),
            reason: "bad xml".into(),
        });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.files_scanned, 1);
        assert_eq!(snapshot.points_examined, 120);
        assert_eq!(snapshot.empty, 1);
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.files_completed(), 3);
    }

    #[test]
    fn test_stats_add() {
        let a = ScanStats {
            files_scanned: 1,
            points_examined: 10,
            empty: 0,
            skipped: 2,
        };
        let b = ScanStats {
            files_scanned: 3,
            points_examined: 5,
            empty: 1,
            skipped: 0,
        };
        assert_eq!(
            a + b,
            ScanStats {
                files_scanned: 4,
                points_examined: 15,
                empty: 1,
                skipped: 2,
            }
        );
    }
}
