//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports, following the
//! Port/Adapter (Hexagonal) architecture pattern.
//!
//! - [`StdoutSink`] / [`MemorySink`] implement `LineSink`
//! - [`SimulatedMover`] implements `VolumeMover` against an `EventSink`
//!
//! # Usage
//!
//! ```ignore
//! use pvmover::adapters::{SimulatedMover, SimulatedMoverConfig, StdoutSink};
//!
//! let out = Arc::new(StdoutSink::new());
//! let reporter = ProgressReporter::new(out.clone());
//! let mover = SimulatedMover::new(SimulatedMoverConfig::default(), reporter.clone());
//! ```

mod console;
mod sim;

pub use console::{MemorySink, StdoutSink};
pub use sim::{SimulatedMover, SimulatedMoverConfig};
