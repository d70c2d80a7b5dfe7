//! Progress reporting module
//!
//! Bridges the shared progress-event channel to per-operation output lines.

mod reporter;

pub use reporter::ProgressReporter;
