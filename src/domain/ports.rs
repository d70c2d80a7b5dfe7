//! Domain Ports (Port/Adapter Pattern)
//!
//! This module defines the abstractions the move runner depends on.
//! Infrastructure adapters implement these traits to provide concrete
//! implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Runner / Reporter                      │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                   Ports (Traits)                     │    │
//! │  │      VolumeMover │ EventSink │ LineSink              │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Adapters (Impls)                          │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │  SimulatedMover │ ProgressReporter │ StdoutSink      │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::events::ProgressEvent;
use crate::error::Result;

// =============================================================================
// Value Objects
// =============================================================================

/// Identifier for one concurrently running worker (value object).
///
/// Allocated by the task runner when a unit is launched. The progress
/// reporter uses it only as a map key and never inspects it beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub u64);

impl WorkerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by a move operation's progress channel (value object).
///
/// Distinct from [`WorkerId`]: the backend numbers its tasks independently
/// of which worker invoked the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block device path (value object).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevicePath(pub String);

impl DevicePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DevicePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DevicePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DevicePath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Progress Delivery Port
// =============================================================================

/// Port for delivering progress events from running operations.
///
/// The backend invokes this from any of its internal execution contexts,
/// potentially concurrently with itself for different task identifiers, so
/// implementations must be reentrant-safe.
pub trait EventSink: Send + Sync {
    /// Deliver one progress event.
    fn deliver(&self, event: ProgressEvent);
}

// =============================================================================
// Output Port
// =============================================================================

/// Port for the shared line-oriented output sink.
///
/// Each call writes one whole line. Lines from different tasks interleave in
/// whatever order events are delivered; there is no grouping guarantee beyond
/// the per-line prefix.
pub trait LineSink: Send + Sync {
    /// Emit one line of output.
    fn line(&self, text: &str);
}

// =============================================================================
// Volume Mover Port
// =============================================================================

/// Port for the storage backend that performs the actual data move.
///
/// The call is synchronous from the caller's point of view: the future
/// resolves once the move has completed or failed. Progress is emitted
/// through the [`EventSink`] the adapter was constructed with, from whatever
/// execution context the backend chooses.
#[async_trait]
pub trait VolumeMover: Send + Sync {
    /// Move the extents of `source` to `target` (or backend-chosen space
    /// when `target` is `None`), reporting progress as the move runs.
    async fn pvmove(
        &self,
        worker: WorkerId,
        source: &DevicePath,
        target: Option<&DevicePath>,
    ) -> Result<()>;
}

// =============================================================================
// Tests
// =============================================================================
