//! Scan coordinator - orchestrates discovery, dispatch and reporting
//!
//! The coordinator is responsible for:
//! - Discovering candidate files and fixing the total
//! - Dispatching them to a worker pool or scanning them in order
//! - Counting completions and rendering progress
//! - Signal handling (graceful shutdown)
//! - Emitting the two aggregated minima once every file is accounted for

use super::discovery::discover;
use super::file_scan::FileScanner;
use super::queue::{FileTask, TaskQueue};
use super::sink::{OutputLine, OutputSink, ProgressSink};
use super::worker::{aggregate_stats, Worker, WorkerStats};
use super::{Aggregator, BestMatch, Classification, ScanStats};
use crate::config::{ScanConfig, ScanMode};
use crate::error::{FinderError, Result, ScanOutcome, WorkerError};
use crate::track::{DistanceOracle, GpxLoader, TrackLoader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Completed-file counter in [0, total]
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
}

impl ProgressCounter {
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Record one finished file; returns the new completed count
    pub fn advance(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }

    /// Rounded completion percentage; an empty run counts as done
    pub fn percentage(&self) -> u8 {
        percentage(self.completed(), self.total)
    }
}

fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (completed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Result of a completed scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Files discovered
    pub total_files: usize,

    /// Nearest file within the radius
    pub in_range: Option<BestMatch>,

    /// Nearest file beyond the radius
    pub out_of_range: Option<BestMatch>,

    /// Per-outcome counts
    pub stats: ScanStats,

    /// Time taken for the scan
    pub duration: Duration,
}

impl ScanReport {
    fn empty(duration: Duration) -> Self {
        Self {
            total_files: 0,
            in_range: None,
            out_of_range: None,
            stats: ScanStats::default(),
            duration,
        }
    }
}

/// Coordinates a scan over a directory tree
pub struct ScanCoordinator {
    /// Configuration
    config: Arc<ScanConfig>,

    /// Track file loader
    loader: Arc<dyn TrackLoader>,

    /// Distance measurement
    oracle: Arc<dyn DistanceOracle>,

    /// Where per-file lines, diagnostics and results go
    output: Arc<dyn OutputSink>,

    /// Where progress percentages go
    progress: Arc<dyn ProgressSink>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl ScanCoordinator {
    /// Create a coordinator using the GPX loader and the configured metric
    pub fn new(
        config: ScanConfig,
        output: Arc<dyn OutputSink>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        let oracle: Arc<dyn DistanceOracle> = Arc::new(config.metric);
        Self {
            config: Arc::new(config),
            loader: Arc::new(GpxLoader::new()),
            oracle,
            output,
            progress,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the track loader
    pub fn with_loader(mut self, loader: Arc<dyn TrackLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the distance oracle
    pub fn with_oracle(mut self, oracle: Arc<dyn DistanceOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Discover candidate files under the configured root
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        Ok(discover(&self.config)?)
    }

    /// Discover and scan in one go
    pub fn run(&self) -> Result<ScanReport> {
        let files = self.discover()?;
        self.scan_files(files)
    }

    /// Scan an explicit list of files
    ///
    /// Blocks until every file is accounted for, then emits the nearest
    /// in-range and out-of-range lines. Returns `Interrupted` without
    /// reporting anything if the shutdown flag was raised mid-scan.
    pub fn scan_files(&self, files: Vec<PathBuf>) -> Result<ScanReport> {
        self.config.validate()?;

        let start_time = Instant::now();
        let total = files.len();

        if total == 0 {
            info!("No track files to scan");
            return Ok(ScanReport::empty(start_time.elapsed()));
        }

        let aggregator = Arc::new(Aggregator::new());
        let scanner = Arc::new(
            FileScanner::new(
                self.config.target,
                self.config.radius,
                Arc::clone(&self.loader),
                Arc::clone(&self.oracle),
                Arc::clone(&aggregator),
                Arc::clone(&self.output),
            )
            .debug(self.config.debug)
            .warnings(self.config.warnings),
        );
        let counter = ProgressCounter::new(total);

        info!(
            files = total,
            mode = ?self.config.mode,
            radius = self.config.radius,
            "Starting scan"
        );

        self.progress.report(0);

        let stats = match self.config.mode {
            ScanMode::Concurrent { workers } => {
                self.run_concurrent(files, workers, &scanner, &counter)?
            }
            ScanMode::Sequential => self.run_sequential(files, &scanner, &counter),
        };

        if self.shutdown.load(Ordering::SeqCst) {
            info!(
                completed = counter.completed(),
                total = total,
                "Scan interrupted"
            );
            return Err(FinderError::Interrupted);
        }

        // Both completion signals must agree before results are trusted
        if !counter.is_complete() || stats.files_completed() != total as u64 {
            return Err(WorkerError::Incomplete {
                completed: counter.completed(),
                total,
            }
            .into());
        }

        let report = ScanReport {
            total_files: total,
            in_range: aggregator.best_in_range(),
            out_of_range: aggregator.best_out_of_range(),
            stats,
            duration: start_time.elapsed(),
        };

        self.emit_report(&report);

        info!(
            files = report.stats.files_scanned,
            skipped = report.stats.skipped,
            empty = report.stats.empty,
            points = report.stats.points_examined,
            duration_ms = report.duration.as_millis() as u64,
            "Scan completed"
        );

        Ok(report)
    }

    /// Scan files one at a time on the calling thread
    fn run_sequential(
        &self,
        files: Vec<PathBuf>,
        scanner: &FileScanner,
        counter: &ProgressCounter,
    ) -> ScanStats {
        let stats = WorkerStats::default();

        for path in files {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let outcome = scanner.scan_one(&path);
            stats.record(&outcome);
            counter.advance();
            self.progress.report(counter.percentage());
        }

        stats.snapshot()
    }

    /// Scan files on a bounded worker pool
    fn run_concurrent(
        &self,
        files: Vec<PathBuf>,
        worker_count: usize,
        scanner: &Arc<FileScanner>,
        counter: &ProgressCounter,
    ) -> Result<ScanStats> {
        let total = files.len();
        let queue = TaskQueue::new(self.config.queue_size);
        let queue_stats = queue.stats();
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<ScanOutcome>();

        // No point starting more threads than there are files
        let worker_count = worker_count.clamp(1, total);
        let mut workers = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let worker = Worker::spawn(
                id,
                Arc::clone(scanner),
                queue.receiver(),
                done_tx.clone(),
                Arc::clone(&self.shutdown),
            );
            match worker {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    self.shutdown.store(true, Ordering::SeqCst);
                    drop(queue);
                    let _ = join_workers(workers);
                    return Err(e.into());
                }
            }
        }
        info!(count = workers.len(), "Workers spawned");

        // Only the workers hold senders now, so the channel closes with them
        drop(done_tx);

        let shutdown = Arc::clone(&self.shutdown);
        let feeder = thread::Builder::new()
            .name("feeder".to_string())
            .spawn(move || {
                let tasks = files
                    .into_iter()
                    .enumerate()
                    .map(|(index, path)| FileTask::new(path, index));
                queue.feed(tasks, &shutdown)
            })
            .map_err(|e| WorkerError::FeederFailed {
                reason: e.to_string(),
            });
        let feeder = match feeder {
            Ok(feeder) => feeder,
            Err(e) => {
                // The queue moved into the failed closure and is dropped, so
                // workers see it disconnect and exit
                let _ = join_workers(workers);
                return Err(e.into());
            }
        };

        // Awaiting: every completion event advances the counter and redraws
        for _outcome in done_rx.iter() {
            counter.advance();
            self.progress.report(counter.percentage());
        }

        let enqueued = feeder.join().map_err(|_| WorkerError::FeederFailed {
            reason: "feeder thread panicked".into(),
        })?;
        if enqueued < total && !self.shutdown.load(Ordering::SeqCst) {
            warn!(enqueued = enqueued, total = total, "Not every file was queued");
        }
        debug!(
            enqueued = queue_stats.enqueued.load(Ordering::Relaxed),
            dequeued = queue_stats.dequeued.load(Ordering::Relaxed),
            "Task queue closed"
        );

        let stats = aggregate_stats(&workers);
        join_workers(workers)?;

        Ok(stats)
    }

    /// Reporting: one line per non-empty slot
    fn emit_report(&self, report: &ScanReport) {
        let slots = [
            (Classification::InRange, &report.in_range),
            (Classification::OutOfRange, &report.out_of_range),
        ];

        for (classification, best) in slots {
            if let Some(best) = best {
                self.output.emit(OutputLine::Nearest {
                    classification,
                    best: best.clone(),
                });
            }
        }
    }
}

/// Join all worker threads, returning the first failure
fn join_workers(workers: Vec<Worker>) -> std::result::Result<(), WorkerError> {
    let mut first_error = None;
    for worker in workers {
        let id = worker.id();
        if let Err(e) = worker.join() {
            warn!(worker = id, error = %e, "Worker failed to join cleanly");
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
