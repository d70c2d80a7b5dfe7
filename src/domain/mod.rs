//! Domain Layer
//!
//! Core abstractions of the move runner:
//!
//! - **Ports** (`ports.rs`) - Trait abstractions for the storage backend and
//!   the output sink, plus the identifier value objects
//! - **Events** (`events.rs`) - Progress events reported by running moves
//!
//! # Usage
//!
//! ```ignore
//! use pvmover::domain::ports::{EventSink, VolumeMover};
//! use pvmover::domain::events::ProgressEvent;
//!
//! // Adapters implement the ports; the reporter consumes the events.
//! async fn move_extents<M: VolumeMover>(mover: &M, worker: WorkerId) -> Result<()> {
//!     mover.pvmove(worker, &src, Some(&dst)).await
//! }
//! ```

pub mod events;
pub mod ports;

// Re-export commonly used types
pub use events::ProgressEvent;
pub use ports::{
    // Port traits
    EventSink,
    LineSink,
    VolumeMover,
    // Value objects
    DevicePath,
    TaskId,
    WorkerId,
};
