//! Console output for the scanner
//!
//! Provides the single-line progress display (indicatif), the per-file and
//! final result lines, and the styled header/summary blocks.

use crate::scanner::sink::format_match;
use crate::scanner::{OutputLine, OutputSink, ProgressSink, ScanReport};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Terminal sink: progress redrawn in place on stderr, results on stdout
pub struct ConsoleReporter {
    /// Progress line
    bar: ProgressBar,
}

impl ConsoleReporter {
    /// Create a reporter; a hidden one still prints result lines
    pub fn new(show_progress: bool) -> Self {
        let bar = if show_progress {
            ProgressBar::new(100)
        } else {
            ProgressBar::hidden()
        };

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        Self { bar }
    }

    /// Leave the last progress line on screen
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleReporter {
    fn report(&self, percentage: u8) {
        let message = format!("{}% scanning...", percentage);
        self.bar.set_position(u64::from(percentage));
        if percentage >= 100 {
            // Freeze the line so the final results print below it
            self.bar.finish_with_message(message);
        } else {
            self.bar.set_message(message);
        }
    }
}

impl OutputSink for ConsoleReporter {
    fn emit(&self, line: OutputLine) {
        let print = || match &line {
            OutputLine::Match { .. } => println!("{}", line),
            OutputLine::Diagnostic(message) => eprintln!("{}", style(message).yellow()),
            OutputLine::Nearest {
                classification,
                best,
            } => {
                println!();
                println!("{}", style(format!("{}:", classification.label())).bold());
                println!("{}", format_match(best.distance, &best.path));
            }
        };

        if self.bar.is_finished() {
            print();
        } else {
            // suspend() clears the progress line, prints, then redraws it below
            self.bar.suspend(print);
        }
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// The line announcing what is about to be scanned
pub fn search_line(root: &Path, files: usize, extension: &str) -> String {
    format!(
        "searching in {} ({} {}-Files) ...",
        root.display(),
        format_number(files as u64),
        extension.to_uppercase()
    )
}

/// Print the search line, printed even in quiet mode
pub fn print_search_line(root: &Path, files: usize, extension: &str) {
    eprintln!("{}", search_line(root, files, extension));
}

/// Print a header at the start of the scan
pub fn print_header(workers: usize, radius: f64) {
    eprintln!();
    eprintln!(
        "{} {}",
        style("gpx-nearest").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Workers:").bold(), workers);
    eprintln!("  {} {:.0} m", style("Radius:").bold(), radius);
    eprintln!();
}

/// Print a summary of the scan statistics
pub fn print_summary(report: &ScanReport) {
    let stats = &report.stats;
    let duration_secs = report.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        stats.points_examined as f64 / duration_secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("{}", style("Scan Complete").green().bold());
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!(
        "  {} {}",
        style("Files:").bold(),
        format_number(report.total_files as u64)
    );
    eprintln!(
        "  {} {}",
        style("Points:").bold(),
        format_number(stats.points_examined)
    );
    eprintln!(
        "  {} {:.1}s ({:.0} points/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if stats.empty > 0 {
        eprintln!(
            "  {} {}",
            style("Empty:").yellow().bold(),
            format_number(stats.empty)
        );
    }
    if stats.skipped > 0 {
        eprintln!(
            "  {} {}",
            style("Unreadable:").yellow().bold(),
            format_number(stats.skipped)
        );
    }
    eprintln!();
}
