//! pvmover
//!
//! Demo binary: moves two physical volumes in parallel through the
//! simulated backend, with all progress flowing through one shared
//! reporter onto stdout.

use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pvmover::{
    EventSink, LineSink, MoveSpec, ProgressReporter, SimulatedMover, SimulatedMoverConfig,
    StdoutSink, TaskRunner,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Concurrent pvmove runner with shared progress reporting
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Direction mode: "ab" moves sda to sdb with the second move
    /// staggered; any other value moves sdb back to sda
    mode: String,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                std::process::exit(0);
            }
            // usage errors exit silently with status 1
            _ => std::process::exit(1),
        },
    };

    init_logging();

    let out: Arc<dyn LineSink> = Arc::new(StdoutSink::new());
    let reporter = ProgressReporter::new(Arc::clone(&out));
    let mover = SimulatedMover::new(
        SimulatedMoverConfig::default(),
        reporter.clone() as Arc<dyn EventSink>,
    );
    let runner = TaskRunner::new(reporter, mover, out);

    let results = runner.run_all(plan(&args.mode)).await;
    for result in results {
        if let Err(err) = result {
            error!("Move failed: {err}");
        }
    }
}

fn plan(mode: &str) -> Vec<MoveSpec> {
    if mode == "ab" {
        vec![
            MoveSpec::new("/dev/sda1").with_target("/dev/sdb1"),
            MoveSpec::new("/dev/sda2")
                .with_target("/dev/sdb2")
                .with_startup_delay(Duration::from_secs(5)),
        ]
    } else {
        vec![
            MoveSpec::new("/dev/sdb1").with_target("/dev/sda1"),
            MoveSpec::new("/dev/sdb2").with_target("/dev/sda2"),
        ]
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging() {
    // Diagnostics go to stderr; stdout carries only progress lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
