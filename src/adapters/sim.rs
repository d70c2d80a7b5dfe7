//! Simulated Mover Adapter
//!
//! Implements the `VolumeMover` port without touching any real block
//! device: each move walks a configurable completion ramp, emitting the
//! same event sequence a real backend would (started, progress updates,
//! one terminal event) through the sink registered at construction.
//!
//! Task identifiers are assigned from an atomic counter, independent of
//! which worker invoked the move. A second concurrent move of the same
//! source device is refused while the first one is still running.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::domain::events::ProgressEvent;
use crate::domain::ports::{DevicePath, EventSink, TaskId, VolumeMover, WorkerId};
use crate::error::{Error, Result};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the simulated mover
#[derive(Debug, Clone)]
pub struct SimulatedMoverConfig {
    /// Number of progress callbacks emitted per move.
    ///
    /// With more than 100 steps, consecutive callbacks repeat percentages;
    /// suppressing those duplicates is the reporter's job, not the mover's.
    pub steps: u32,

    /// Pause between progress callbacks.
    pub step_delay: Duration,

    /// Fail moves of this source device once they reach `fail_at` percent.
    pub fail_source: Option<DevicePath>,

    /// Completion percentage at which `fail_source` moves fail.
    pub fail_at: u8,
}

impl Default for SimulatedMoverConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            step_delay: Duration::from_millis(100),
            fail_source: None,
            fail_at: 0,
        }
    }
}

// =============================================================================
// Simulated Mover
// =============================================================================

/// Simulates long-running extent moves, reporting progress through the
/// shared event sink.
pub struct SimulatedMover {
    config: SimulatedMoverConfig,
    sink: Arc<dyn EventSink>,
    /// Task identifiers are global across all moves, like a backend that
    /// numbers its operations process-wide.
    next_task: AtomicU64,
    /// Track moves in flight to refuse duplicates per source device.
    active: DashMap<String, WorkerId>,
}

impl SimulatedMover {
    /// Create a new simulated mover delivering events to `sink`.
    pub fn new(config: SimulatedMoverConfig, sink: Arc<dyn EventSink>) -> Arc<Self> {
        Arc::new(Self {
            config,
            sink,
            next_task: AtomicU64::new(0),
            active: DashMap::new(),
        })
    }

    /// Check if a move of this source device is currently running.
    pub fn is_moving(&self, source: &DevicePath) -> bool {
        self.active.contains_key(source.as_str())
    }

    /// Get count of moves in flight.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Walk the completion ramp for one move, emitting progress events.
    async fn drive(&self, task: TaskId, source: &DevicePath) -> Result<()> {
        let steps = self.config.steps.max(1);
        for step in 1..=steps {
            sleep(self.config.step_delay).await;
            let completion = ((step * 100) / steps) as u8;

            if let Some(fail_source) = &self.config.fail_source {
                if fail_source == source && completion >= self.config.fail_at {
                    let reason = "simulated device failure";
                    self.sink.deliver(ProgressEvent::failed(task, reason));
                    return Err(Error::MoveFailed {
                        device: source.to_string(),
                        reason: reason.to_string(),
                    });
                }
            }

            self.sink.deliver(ProgressEvent::progress(task, completion));
        }

        self.sink.deliver(ProgressEvent::finished(task, "Finished"));
        Ok(())
    }
}

#[async_trait]
impl VolumeMover for SimulatedMover {
    async fn pvmove(
        &self,
        worker: WorkerId,
        source: &DevicePath,
        target: Option<&DevicePath>,
    ) -> Result<()> {
        match self.active.entry(source.to_string()) {
            Entry::Occupied(_) => {
                return Err(Error::MoveInProgress {
                    device: source.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(worker);
            }
        }

        let task = TaskId::new(self.next_task.fetch_add(1, Ordering::Relaxed) + 1);
        info!(task = %task, worker = %worker, source = %source, "Starting move");

        let message = match target {
            Some(target) => format!("Moving data from {source} to {target}"),
            None => format!("Moving data from {source}"),
        };
        self.sink.deliver(ProgressEvent::started(task, worker, message));

        let result = self.drive(task, source).await;

        self.active.remove(source.as_str());
        debug!(task = %task, success = result.is_ok(), "Move ended");
        result
    }
}

// =============================================================================
// Tests
// =============================================================================
