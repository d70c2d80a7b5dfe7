//! Task Runner
//!
//! Launches N independent long-running move operations concurrently. Each
//! unit registers its action description with the progress reporter before
//! the operation starts, so the reporter can prefix that unit's lines from
//! the moment the started event arrives, then optionally waits out a
//! startup delay and invokes the mover.
//!
//! The runner provides no cancellation: once invoked, a move runs to
//! completion or to its own failure, and a failing unit does not affect
//! its siblings.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::domain::ports::{DevicePath, LineSink, VolumeMover, WorkerId};
use crate::error::{Error, Result};
use crate::progress::ProgressReporter;

// =============================================================================
// Move Specification
// =============================================================================

/// One requested move: source device, optional target device, optional
/// startup delay used to stagger start times.
#[derive(Debug, Clone)]
pub struct MoveSpec {
    pub source: DevicePath,
    pub target: Option<DevicePath>,
    pub startup_delay: Duration,
}

impl MoveSpec {
    /// Create a spec moving `source` to backend-chosen space.
    pub fn new(source: impl Into<DevicePath>) -> Self {
        Self {
            source: source.into(),
            target: None,
            startup_delay: Duration::ZERO,
        }
    }

    /// Move to an explicit target device.
    pub fn with_target(mut self, target: impl Into<DevicePath>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Delay the unit before it invokes the move.
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Action description used to prefix this move's progress lines.
    fn action(&self) -> String {
        match &self.target {
            Some(target) => format!("pvmove {} {}", self.source, target),
            None => format!("pvmove {}", self.source),
        }
    }
}

// =============================================================================
// Task Runner
// =============================================================================

/// Runs moves in parallel against one mover and one progress reporter.
pub struct TaskRunner {
    reporter: Arc<ProgressReporter>,
    mover: Arc<dyn VolumeMover>,
    out: Arc<dyn LineSink>,
    next_worker: AtomicU64,
}

impl TaskRunner {
    /// Create a new task runner.
    pub fn new(
        reporter: Arc<ProgressReporter>,
        mover: Arc<dyn VolumeMover>,
        out: Arc<dyn LineSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            reporter,
            mover,
            out,
            next_worker: AtomicU64::new(0),
        })
    }

    fn next_worker(&self) -> WorkerId {
        WorkerId::new(self.next_worker.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Run one move to completion.
    ///
    /// Registers the action description for a freshly allocated worker,
    /// waits out the startup delay, then invokes the mover. The mover's
    /// error, if any, is returned untranslated.
    pub async fn run_move(&self, spec: MoveSpec) -> Result<()> {
        let worker = self.next_worker();
        self.reporter.register_action(worker, spec.action());

        if spec.startup_delay > Duration::ZERO {
            debug!(worker = %worker, delay = ?spec.startup_delay, "Delaying start");
            sleep(spec.startup_delay).await;
        }

        self.mover
            .pvmove(worker, &spec.source, spec.target.as_ref())
            .await
    }

    /// Run all specs in parallel and wait for every one of them.
    ///
    /// Returns one result per spec, in spec order. A failing unit neither
    /// cancels nor affects its siblings; its error only shows up in the
    /// slot for that spec.
    pub async fn run_all(self: &Arc<Self>, specs: Vec<MoveSpec>) -> Vec<Result<()>> {
        self.out.line("Creating threads");
        info!(count = specs.len(), "Launching move tasks");

        self.out.line("Starting threads");
        let handles: Vec<_> = specs
            .into_iter()
            .map(|spec| {
                let runner = Arc::clone(self);
                tokio::spawn(async move { runner.run_move(spec).await })
            })
            .collect();

        self.out.line("Waiting for threads");
        let results = join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(Error::Internal(format!("move task panicked: {e}"))),
            })
            .collect();

        self.out.line("Done");
        results
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySink, SimulatedMover, SimulatedMoverConfig};
    use crate::domain::ports::EventSink;

    fn harness() -> (Arc<TaskRunner>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let reporter = ProgressReporter::new(sink.clone() as Arc<dyn LineSink>);
        let config = SimulatedMoverConfig {
            steps: 4,
            step_delay: Duration::from_millis(1),
            ..SimulatedMoverConfig::default()
        };
        let mover = SimulatedMover::new(config, reporter.clone() as Arc<dyn EventSink>);
        let runner = TaskRunner::new(reporter, mover, sink.clone() as Arc<dyn LineSink>);
        (runner, sink)
    }

    #[test]
    fn test_action_description_format() {
        let spec = MoveSpec::new("/dev/sda1").with_target("/dev/sdb1");
        assert_eq!(spec.action(), "pvmove /dev/sda1 /dev/sdb1");

        let spec = MoveSpec::new("/dev/sda1");
        assert_eq!(spec.action(), "pvmove /dev/sda1");
    }

    #[test]
    fn test_spec_builder_defaults() {
        let spec = MoveSpec::new("/dev/sda1");
        assert_eq!(spec.startup_delay, Duration::ZERO);
        assert!(spec.target.is_none());

        let spec = spec.with_startup_delay(Duration::from_secs(5));
        assert_eq!(spec.startup_delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_run_move_registers_before_start() {
        let (runner, sink) = harness();

        runner
            .run_move(MoveSpec::new("/dev/sda1").with_target("/dev/sdb1"))
            .await
            .unwrap();

        let lines = sink.lines();
        // the started message comes first, already resolvable to the action
        assert_eq!(lines[0], "Moving data from /dev/sda1 to /dev/sdb1");
        assert_eq!(
            sink.lines_with_prefix("pvmove /dev/sda1 /dev/sdb1:"),
            vec![
                "pvmove /dev/sda1 /dev/sdb1: 25 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: 50 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: 75 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: 100 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: Finished".to_string(),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_all_milestones_in_order() {
        let (runner, sink) = harness();

        let results = runner
            .run_all(vec![
                MoveSpec::new("/dev/sda1").with_target("/dev/sdb1"),
                MoveSpec::new("/dev/sda2").with_target("/dev/sdb2"),
            ])
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Result::is_ok));

        let lines = sink.lines();
        let milestones: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| {
                matches!(
                    *line,
                    "Creating threads" | "Starting threads" | "Waiting for threads" | "Done"
                )
            })
            .collect();
        assert_eq!(
            milestones,
            vec![
                "Creating threads",
                "Starting threads",
                "Waiting for threads",
                "Done"
            ]
        );
        // the join barrier means nothing is emitted after Done
        assert_eq!(lines.last().map(String::as_str), Some("Done"));
    }

    #[tokio::test]
    async fn test_workers_get_distinct_ids() {
        let (runner, _sink) = harness();

        assert_eq!(runner.next_worker(), WorkerId::new(1));
        assert_eq!(runner.next_worker(), WorkerId::new(2));
        assert_eq!(runner.next_worker(), WorkerId::new(3));
    }
}
