//! Bounded task queue between the feeder and the scan workers
//!
//! The feeder owns the only sender. Once it has pushed every task (or seen
//! the shutdown flag) it drops the sender, and workers see the queue
//! disconnect after draining what is left. The queue gives up its own
//! receiver when feeding starts, so a send fails once every worker is gone.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A file to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Absolute path of the track file
    pub path: PathBuf,

    /// Position in discovery order
    pub index: usize,
}

impl FileTask {
    pub fn new(path: PathBuf, index: usize) -> Self {
        Self { path, index }
    }
}

/// Statistics for the task queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,
}

/// Task queue with a fixed capacity
pub struct TaskQueue {
    sender: Sender<FileTask>,
    receiver: Receiver<FileTask>,
    stats: Arc<QueueStats>,
}

impl TaskQueue {
    /// Create a new task queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));

        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> TaskReceiver {
        TaskReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Push every task, then close the queue
    ///
    /// Only receivers handed out before this call keep the queue open. Stops
    /// early if `shutdown` is raised or every one of them is gone. Returns the
    /// number of tasks enqueued.
    pub fn feed<I>(self, tasks: I, shutdown: &AtomicBool) -> usize
    where
        I: IntoIterator<Item = FileTask>,
    {
        let TaskQueue {
            sender,
            receiver,
            stats,
        } = self;
        drop(receiver);

        let mut sent = 0;
        for task in tasks {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            // Blocks while the queue is full; fails once no receiver is left
            if sender.send(task).is_err() {
                break;
            }
            stats.enqueued.fetch_add(1, Ordering::Relaxed);
            sent += 1;
        }
        sent
    }
}

/// Handle for receiving tasks from the queue
#[derive(Clone)]
pub struct TaskReceiver {
    receiver: Receiver<FileTask>,
    stats: Arc<QueueStats>,
}

impl TaskReceiver {
    /// Receive a task from the queue
    ///
    /// Blocks until a task is available; `None` once the queue is closed
    /// and drained.
    pub fn recv(&self) -> Option<FileTask> {
        match self.receiver.recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }
}
