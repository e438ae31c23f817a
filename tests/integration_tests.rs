//! Integration tests for gpx-nearest
//!
//! These build small GPX trees in a temporary directory and run the full
//! discover → scan → report pipeline with the real GPX loader.

use gpx_nearest::config::{ScanConfig, ScanMode};
use gpx_nearest::error::FinderError;
use gpx_nearest::scanner::{OutputLine, OutputSink, ProgressSink, RecordingSink, ScanCoordinator};
use gpx_nearest::track::{Coordinate, DistanceMetric};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn gpx_document(points: &[(f64, f64)]) -> String {
    let trkpts: String = points
        .iter()
        .map(|(lat, lon)| format!("      <trkpt lat=\"{lat}\" lon=\"{lon}\"></trkpt>\n"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="integration" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
{trkpts}    </trkseg>
  </trk>
</gpx>
"#
    )
}

fn write_gpx(root: &Path, name: &str, points: &[(f64, f64)]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, gpx_document(points)).unwrap();
}

fn coordinator(root: &Path, mode: ScanMode, sink: &Arc<RecordingSink>) -> ScanCoordinator {
    let config = ScanConfig::new(Coordinate::new(0.0, 0.0), 1000.0)
        .with_root(root)
        .with_mode(mode)
        .with_metric(DistanceMetric::Haversine)
        .with_warnings(true);
    ScanCoordinator::new(
        config,
        Arc::clone(sink) as Arc<dyn OutputSink>,
        Arc::clone(sink) as Arc<dyn ProgressSink>,
    )
}

/// ~50 m, ~2000 m, one broken file, one empty file
fn scenario_tree(root: &Path) {
    write_gpx(root, "near/f1.gpx", &[(0.01, 0.01), (0.0, 0.00045)]);
    write_gpx(root, "far/f2.gpx", &[(0.0, 0.018), (0.5, 0.5)]);
    fs::write(root.join("f3.gpx"), "<gpx><trk>").unwrap();
    write_gpx(root, "f4.gpx", &[]);
    fs::write(root.join("notes.txt"), "not a track").unwrap();
}

#[test]
fn test_scenario_nearest_in_and_out_of_range() {
    let dir = tempdir().unwrap();
    scenario_tree(dir.path());

    for mode in [ScanMode::Sequential, ScanMode::Concurrent { workers: 4 }] {
        let sink = Arc::new(RecordingSink::new());
        let report = coordinator(dir.path(), mode, &sink).run().unwrap();

        assert_eq!(report.total_files, 4);
        assert_eq!(report.stats.files_scanned, 2);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.empty, 1);

        let in_range = report.in_range.unwrap();
        assert!((in_range.distance - 50.0).abs() < 1.0, "{}", in_range.distance);
        assert!(in_range.path.ends_with("near/f1.gpx"));
        assert!(in_range.path.is_absolute());

        let out = report.out_of_range.unwrap();
        assert!((out.distance - 2001.5).abs() < 2.0, "{}", out.distance);
        assert!(out.path.ends_with("far/f2.gpx"));

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .any(|d| d.starts_with("Error while parsing the file:") && d.ends_with("f3.gpx")));
        assert!(diagnostics
            .iter()
            .any(|d| d.starts_with("No track points in file:") && d.ends_with("f4.gpx")));

        let matches = sink.matches();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].1.ends_with("near/f1.gpx"));

        assert_eq!(sink.progress().last(), Some(&100));
    }
}

#[test]
fn test_result_lines_format() {
    let dir = tempdir().unwrap();
    scenario_tree(dir.path());

    let sink = Arc::new(RecordingSink::new());
    coordinator(dir.path(), ScanMode::Sequential, &sink)
        .run()
        .unwrap();

    let rendered: Vec<String> = sink
        .lines()
        .iter()
        .filter(|line| matches!(line, OutputLine::Match { .. } | OutputLine::Nearest { .. }))
        .map(|line| line.to_string())
        .collect();

    assert_eq!(rendered.len(), 3);
    assert!(rendered[0].starts_with("      50 m, "));
    assert!(rendered[1].starts_with("Nearest in range:       50 m, "));
    assert!(rendered[2].starts_with("Nearest out of range:     2002 m, "));
}

#[test]
fn test_empty_tree_reports_nothing() {
    let dir = tempdir().unwrap();

    let sink = Arc::new(RecordingSink::new());
    let report = coordinator(dir.path(), ScanMode::Concurrent { workers: 2 }, &sink)
        .run()
        .unwrap();

    assert_eq!(report.total_files, 0);
    assert!(report.in_range.is_none());
    assert!(report.out_of_range.is_none());
    assert!(sink.lines().is_empty());
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let sink = Arc::new(RecordingSink::new());

    let err = coordinator(&dir.path().join("missing"), ScanMode::Sequential, &sink)
        .run()
        .unwrap_err();

    assert!(matches!(err, FinderError::Traversal(_)));
    assert!(sink.lines().is_empty());
    assert!(sink.progress().is_empty());
}

#[test]
fn test_only_broken_files_still_complete() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("broken{i}.gpx")), "garbage").unwrap();
    }

    let sink = Arc::new(RecordingSink::new());
    let report = coordinator(dir.path(), ScanMode::Concurrent { workers: 3 }, &sink)
        .run()
        .unwrap();

    assert_eq!(report.stats.skipped, 10);
    assert!(report.in_range.is_none());
    assert!(report.out_of_range.is_none());
    assert_eq!(sink.diagnostics().len(), 10);
    assert_eq!(sink.progress().last(), Some(&100));
}

#[test]
fn test_modes_agree_on_larger_tree() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        let offset = 0.001 * (i as f64 + 1.0);
        write_gpx(
            dir.path(),
            &format!("batch{}/t{i:02}.gpx", i % 4),
            &[(offset, offset), (offset * 2.0, 0.0)],
        );
    }

    let run = |mode| {
        let sink = Arc::new(RecordingSink::new());
        coordinator(dir.path(), mode, &sink).run().unwrap()
    };

    let sequential = run(ScanMode::Sequential);
    let concurrent = run(ScanMode::Concurrent { workers: 6 });

    assert_eq!(sequential.in_range, concurrent.in_range);
    assert_eq!(sequential.out_of_range, concurrent.out_of_range);
    assert_eq!(sequential.stats, concurrent.stats);
    assert!(sequential.in_range.unwrap().path.ends_with("batch0/t00.gpx"));
}
