//! Progress Events
//!
//! Events reported by running move operations over the single shared
//! progress channel. The phase set is closed: an event is the started
//! notification, an in-progress completion update, or one of the two
//! terminal outcomes.
//!
//! The started event carries the worker that initiated the operation. That
//! field is what binds a task identifier to a worker: the binding is
//! explicit in the event rather than inferred from the calling thread, so
//! two workers starting operations at the same instant cannot be confused.
//!
//! # Example
//!
//! ```ignore
//! sink.deliver(ProgressEvent::started(task, worker, "Moving data from /dev/sda1"));
//! sink.deliver(ProgressEvent::progress(task, 50));
//! sink.deliver(ProgressEvent::finished(task, "Finished"));
//! ```

use serde::{Deserialize, Serialize};

use super::ports::{TaskId, WorkerId};

/// One event on the shared progress channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEvent {
    /// The operation began and was assigned a task identifier.
    Started {
        task: TaskId,
        worker: WorkerId,
        message: String,
    },

    /// The operation reports a new completion percentage (0-100).
    Progress { task: TaskId, completion: u8 },

    /// The operation finished successfully.
    Finished { task: TaskId, message: String },

    /// The operation failed.
    Failed { task: TaskId, message: String },
}

impl ProgressEvent {
    /// Get the task this event belongs to.
    pub fn task(&self) -> TaskId {
        match self {
            ProgressEvent::Started { task, .. } => *task,
            ProgressEvent::Progress { task, .. } => *task,
            ProgressEvent::Finished { task, .. } => *task,
            ProgressEvent::Failed { task, .. } => *task,
        }
    }

    /// True for the terminal phases (finished or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Finished { .. } | ProgressEvent::Failed { .. }
        )
    }

    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            ProgressEvent::Started { .. } => "Started",
            ProgressEvent::Progress { .. } => "Progress",
            ProgressEvent::Finished { .. } => "Finished",
            ProgressEvent::Failed { .. } => "Failed",
        }
    }
}

// =============================================================================
// Event Builders
// =============================================================================

impl ProgressEvent {
    /// Create a Started event.
    pub fn started(task: TaskId, worker: WorkerId, message: impl Into<String>) -> Self {
        ProgressEvent::Started {
            task,
            worker,
            message: message.into(),
        }
    }

    /// Create a Progress event.
    pub fn progress(task: TaskId, completion: u8) -> Self {
        ProgressEvent::Progress { task, completion }
    }

    /// Create a Finished event.
    pub fn finished(task: TaskId, message: impl Into<String>) -> Self {
        ProgressEvent::Finished {
            task,
            message: message.into(),
        }
    }

    /// Create a Failed event.
    pub fn failed(task: TaskId, message: impl Into<String>) -> Self {
        ProgressEvent::Failed {
            task,
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
