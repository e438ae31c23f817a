//! gpx-nearest - find the GPX tracks that pass closest to a coordinate
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use gpx_nearest::config::{CliArgs, ScanConfig};
use gpx_nearest::progress::{print_header, print_search_line, print_summary, ConsoleReporter};
use gpx_nearest::scanner::{OutputSink, ProgressSink, ScanCoordinator};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Without any arguments there is nothing to search for
    if std::env::args_os().len() <= 1 {
        CliArgs::command()
            .print_help()
            .context("Failed to print usage")?;
        return Ok(());
    }

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;
    let show_progress = config.show_progress;
    let workers = config.worker_count();
    let radius = config.radius;

    let reporter = Arc::new(ConsoleReporter::new(show_progress));
    let coordinator = ScanCoordinator::new(
        config,
        Arc::clone(&reporter) as Arc<dyn OutputSink>,
        Arc::clone(&reporter) as Arc<dyn ProgressSink>,
    );

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let files = coordinator
        .discover()
        .context("Failed to search for track files")?;

    let config = coordinator.config();
    let root = std::path::absolute(&config.root).unwrap_or_else(|_| config.root.clone());
    if show_progress {
        print_header(workers, radius);
    }
    print_search_line(&root, files.len(), &config.extension);

    let result = coordinator.scan_files(files);
    reporter.finish();
    let report = result.context("Scan failed")?;

    if show_progress {
        print_summary(&report);
    }

    if report.in_range.is_none() {
        info!("No track within range");
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("gpx_nearest=debug,warn")
    } else {
        EnvFilter::new("gpx_nearest=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
