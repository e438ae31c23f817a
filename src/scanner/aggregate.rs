//! Thread-safe aggregation of the two running minima
//!
//! Each slot is its own mutex, so in-range and out-of-range updates never
//! contend with each other. A slot holding `None` stands for "infinitely far,
//! no file yet".
//!
//! Ties on distance go to the lexicographically smaller path, which makes
//! the final minima independent of the order files complete in.

use super::{Classification, ScanResult};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// The best file seen so far for one classification
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Distance in meters
    pub distance: f64,

    /// Absolute path of the file
    pub path: PathBuf,
}

impl BestMatch {
    /// True if `self` should replace `other`
    fn beats(&self, other: &BestMatch) -> bool {
        match self.distance.partial_cmp(&other.distance) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.path < other.path,
            _ => false,
        }
    }
}

/// Holds the nearest in-range and nearest out-of-range file
#[derive(Debug, Default)]
pub struct Aggregator {
    in_range: Mutex<Option<BestMatch>>,
    out_of_range: Mutex<Option<BestMatch>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, classification: Classification) -> &Mutex<Option<BestMatch>> {
        match classification {
            Classification::InRange => &self.in_range,
            Classification::OutOfRange => &self.out_of_range,
        }
    }

    /// Offer a result to its slot; returns true if it became the new best
    ///
    /// The compare and the replace of the (distance, path) pair happen under
    /// one lock, so readers never see a distance paired with another file.
    pub fn update(&self, result: &ScanResult) -> bool {
        let candidate = BestMatch {
            distance: result.distance,
            path: result.path.clone(),
        };

        let mut slot = self
            .slot(result.classification)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let replace = match slot.as_ref() {
            None => true,
            Some(current) => candidate.beats(current),
        };

        if replace {
            trace!(
                classification = ?result.classification,
                distance = result.distance,
                path = %result.path.display(),
                "New best"
            );
            *slot = Some(candidate);
        }

        replace
    }

    /// Current best for a classification
    pub fn best(&self, classification: Classification) -> Option<BestMatch> {
        self.slot(classification)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn best_in_range(&self) -> Option<BestMatch> {
        self.best(Classification::InRange)
    }

    pub fn best_out_of_range(&self) -> Option<BestMatch> {
        self.best(Classification::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn result(path: &str, distance: f64, classification: Classification) -> ScanResult {
        ScanResult {
            path: PathBuf::from(path),
            distance,
            classification,
            points: 1,
        }
    }

    #[test]
    fn test_empty_slots() {
        let agg = Aggregator::new();
        assert!(agg.best_in_range().is_none());
        assert!(agg.best_out_of_range().is_none());
    }

    #[test]
    fn test_keeps_minimum_per_slot() {
        let agg = Aggregator::new();
        assert!(agg.update(&result("/a", 500.0, Classification::InRange)));
        assert!(agg.update(&result("/b", 100.0, Classification::InRange)));
        assert!(!agg.update(&result("/c", 300.0, Classification::InRange)));
        assert!(agg.update(&result("/d", 5000.0, Classification::OutOfRange)));
        assert!(!agg.update(&result("/e", 7000.0, Classification::OutOfRange)));

        let in_range = agg.best_in_range().unwrap();
        assert_eq!(in_range.distance, 100.0);
        assert_eq!(in_range.path, PathBuf::from("/b"));

        let out = agg.best_out_of_range().unwrap();
        assert_eq!(out.distance, 5000.0);
        assert_eq!(out.path, PathBuf::from("/d"));
    }

    #[test]
    fn test_slots_are_independent() {
        let agg = Aggregator::new();
        agg.update(&result("/far", 9000.0, Classification::OutOfRange));
        assert!(agg.best_in_range().is_none());
        assert!(agg.best_out_of_range().is_some());
    }

    #[test]
    fn test_tie_goes_to_smaller_path() {
        let agg = Aggregator::new();
        assert!(agg.update(&result("/z.gpx", 42.0, Classification::InRange)));
        assert!(agg.update(&result("/a.gpx", 42.0, Classification::InRange)));
        assert!(!agg.update(&result("/m.gpx", 42.0, Classification::InRange)));
        assert_eq!(agg.best_in_range().unwrap().path, PathBuf::from("/a.gpx"));

        // Same set in the other order lands on the same answer
        let agg = Aggregator::new();
        agg.update(&result("/a.gpx", 42.0, Classification::InRange));
        agg.update(&result("/m.gpx", 42.0, Classification::InRange));
        agg.update(&result("/z.gpx", 42.0, Classification::InRange));
        assert_eq!(agg.best_in_range().unwrap().path, PathBuf::from("/a.gpx"));
    }

    #[test]
    fn test_concurrent_updates() {
        let agg = Arc::new(Aggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let agg = Arc::clone(&agg);
                thread::spawn(move || {
                    for i in 0..500 {
                        let d = (t * 500 + i) as f64 + 10.0;
                        let class = Classification::of(d, 2000.0);
                        agg.update(&result(&format!("/f{t}-{i}"), d, class));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let in_range = agg.best_in_range().unwrap();
        assert_eq!(in_range.distance, 10.0);
        assert_eq!(in_range.path, PathBuf::from("/f0-0"));

        let out = agg.best_out_of_range().unwrap();
        assert_eq!(out.distance, 2001.0);
        assert_eq!(out.path, PathBuf::from("/f3-491"));
    }
}
