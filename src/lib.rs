//! pvmover - Concurrent Physical-Volume Move Runner
//!
//! Launches independent long-running move operations in parallel and turns
//! the single progress-event stream they share into per-operation console
//! lines, each prefixed with the action that produced it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ProgressEvent  ┌──────────────────┐  lines  ┌──────────┐
//! │  move tasks  │ ──────────────▶ │ ProgressReporter │ ──────▶ │ LineSink │
//! │ (TaskRunner) │                 │   (coordinator)  │         │ (stdout) │
//! └──────────────┘                 └──────────────────┘         └──────────┘
//! ```
//!
//! The reporter is the only shared-state component: it maps each worker to
//! its action description, each task identifier to the worker that started
//! it, and each task to its last-seen completion percentage so duplicate
//! callbacks are suppressed. The actual block-device work lives behind the
//! [`domain::ports::VolumeMover`] port; this crate ships a simulated
//! implementation.
//!
//! # Modules
//!
//! - [`adapters`] - Infrastructure adapters implementing the domain ports
//! - [`domain`] - Ports, value objects, and progress events
//! - [`error`] - Error types
//! - [`progress`] - The progress reporter
//! - [`runner`] - Parallel task launching and the wait barrier

pub mod adapters;
pub mod domain;
pub mod error;
pub mod progress;
pub mod runner;

// Re-export commonly used types
pub use adapters::{MemorySink, SimulatedMover, SimulatedMoverConfig, StdoutSink};
pub use domain::events::ProgressEvent;
pub use domain::ports::{DevicePath, EventSink, LineSink, TaskId, VolumeMover, WorkerId};
pub use error::{Error, Result};
pub use progress::ProgressReporter;
pub use runner::{MoveSpec, TaskRunner};
