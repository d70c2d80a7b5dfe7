//! Progress Reporter
//!
//! Bridges the single progress-event channel shared by ALL concurrently
//! running move operations to per-operation, human-readable output lines.
//!
//! The reporter keeps three maps: the action description registered for
//! each worker, the worker that issued the started event for each task,
//! and the last completion percentage seen per task. Repeated completion
//! values are suppressed so frequent near-identical callbacks do not spam
//! the output.
//!
//! # Concurrency
//!
//! Registration and every map read-modify-write happen under one mutex.
//! The lock is released before any line is written, so output from
//! different tasks may interleave, but only at line granularity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::events::ProgressEvent;
use crate::domain::ports::{EventSink, LineSink, TaskId, WorkerId};

// =============================================================================
// Reporter
// =============================================================================

/// Shared, thread-safe registry mapping workers to action descriptions and
/// tasks to the workers that started them.
pub struct ProgressReporter {
    out: Arc<dyn LineSink>,
    state: Mutex<ReporterState>,
}

#[derive(Default)]
struct ReporterState {
    /// Action description per worker, set before the worker runs.
    actions: HashMap<WorkerId, String>,
    /// Worker that issued the started event for each task.
    owners: HashMap<TaskId, WorkerId>,
    /// Last completion percentage seen per task.
    progress: HashMap<TaskId, u8>,
}

impl ProgressReporter {
    /// Create a new reporter writing through the given output sink.
    pub fn new(out: Arc<dyn LineSink>) -> Arc<Self> {
        Arc::new(Self {
            out,
            state: Mutex::new(ReporterState::default()),
        })
    }

    /// Record the action description for a worker.
    ///
    /// Must be called before the worker invokes the operation that will
    /// emit progress events, so the started event finds the description in
    /// place. Calling again for the same worker silently overwrites the
    /// previous description.
    pub fn register_action(&self, worker: WorkerId, description: impl Into<String>) {
        let description = description.into();
        debug!(worker = %worker, action = %description, "Registered action");
        self.state.lock().actions.insert(worker, description);
    }

    /// Action description currently registered for a worker, if any.
    pub fn action_for(&self, worker: WorkerId) -> Option<String> {
        self.state.lock().actions.get(&worker).cloned()
    }

    /// Action description for the worker that started `task`.
    ///
    /// Events for a task that never reported started are a caller bug; the
    /// started event is required to precede every other event for its id.
    fn action_for_task(state: &ReporterState, task: TaskId) -> String {
        let worker = state
            .owners
            .get(&task)
            .expect("progress event for a task that never reported started");
        state
            .actions
            .get(worker)
            .expect("task owner has no registered action")
            .clone()
    }
}

impl EventSink for ProgressReporter {
    fn deliver(&self, event: ProgressEvent) {
        debug!(
            event_type = %event.event_type(),
            event = %serde_json::to_string(&event).unwrap_or_else(|_| format!("{:?}", event)),
            "Progress event"
        );

        // Decide what to print under the lock; print after releasing it.
        let line = {
            let mut state = self.state.lock();
            match &event {
                ProgressEvent::Started {
                    task,
                    worker,
                    message,
                } => {
                    state.owners.insert(*task, *worker);
                    state.progress.insert(*task, 0);
                    Some(message.clone())
                }
                ProgressEvent::Progress { task, completion } => {
                    let last = *state
                        .progress
                        .get(task)
                        .expect("progress event for a task that never reported started");
                    if last == *completion {
                        None
                    } else {
                        state.progress.insert(*task, *completion);
                        Some(format!(
                            "{}: {} %",
                            Self::action_for_task(&state, *task),
                            completion
                        ))
                    }
                }
                ProgressEvent::Finished { task, message }
                | ProgressEvent::Failed { task, message } => Some(format!(
                    "{}: {}",
                    Self::action_for_task(&state, *task),
                    message
                )),
            }
        };

        if let Some(line) = line {
            self.out.line(&line);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySink;
    use proptest::prelude::*;

    fn reporter() -> (Arc<ProgressReporter>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let reporter = ProgressReporter::new(sink.clone() as Arc<dyn LineSink>);
        (reporter, sink)
    }

    #[test]
    fn test_started_emits_message_verbatim() {
        let (reporter, sink) = reporter();
        reporter.register_action(WorkerId::new(1), "pvmove /dev/sda1 /dev/sdb1");

        reporter.deliver(ProgressEvent::started(
            TaskId::new(1),
            WorkerId::new(1),
            "Moving data from /dev/sda1 to /dev/sdb1",
        ));

        assert_eq!(
            sink.lines(),
            vec!["Moving data from /dev/sda1 to /dev/sdb1".to_string()]
        );
    }

    #[test]
    fn test_duplicate_progress_suppressed() {
        let (reporter, sink) = reporter();
        let task = TaskId::new(1);
        let worker = WorkerId::new(1);
        reporter.register_action(worker, "pvmove /dev/sda1 /dev/sdb1");
        reporter.deliver(ProgressEvent::started(task, worker, "started"));

        for completion in [0, 0, 10, 10, 10, 55, 100] {
            reporter.deliver(ProgressEvent::progress(task, completion));
        }

        let progress_lines = sink.lines_with_prefix("pvmove /dev/sda1 /dev/sdb1:");
        assert_eq!(
            progress_lines,
            vec![
                "pvmove /dev/sda1 /dev/sdb1: 10 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: 55 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: 100 %".to_string(),
            ]
        );
        // started line plus the three distinct changes
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_terminal_always_emits() {
        let (reporter, sink) = reporter();
        let task = TaskId::new(1);
        let worker = WorkerId::new(1);
        reporter.register_action(worker, "pvmove /dev/sda1");
        reporter.deliver(ProgressEvent::started(task, worker, "started"));

        reporter.deliver(ProgressEvent::progress(task, 100));
        reporter.deliver(ProgressEvent::progress(task, 100));
        reporter.deliver(ProgressEvent::finished(task, "Finished"));
        // a second terminal event is not suppressed either
        reporter.deliver(ProgressEvent::failed(task, "boom"));

        assert_eq!(
            sink.lines(),
            vec![
                "started".to_string(),
                "pvmove /dev/sda1: 100 %".to_string(),
                "pvmove /dev/sda1: Finished".to_string(),
                "pvmove /dev/sda1: boom".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_cross_contamination_between_tasks() {
        let (reporter, sink) = reporter();
        let (task_a, worker_a) = (TaskId::new(1), WorkerId::new(1));
        let (task_b, worker_b) = (TaskId::new(2), WorkerId::new(2));
        reporter.register_action(worker_a, "pvmove /dev/sda1 /dev/sdb1");
        reporter.register_action(worker_b, "pvmove /dev/sda2 /dev/sdb2");

        reporter.deliver(ProgressEvent::started(task_a, worker_a, "a started"));
        reporter.deliver(ProgressEvent::started(task_b, worker_b, "b started"));
        reporter.deliver(ProgressEvent::progress(task_b, 30));
        reporter.deliver(ProgressEvent::progress(task_a, 60));
        reporter.deliver(ProgressEvent::finished(task_b, "Finished"));
        reporter.deliver(ProgressEvent::finished(task_a, "Finished"));

        assert_eq!(
            sink.lines_with_prefix("pvmove /dev/sda1 /dev/sdb1:"),
            vec![
                "pvmove /dev/sda1 /dev/sdb1: 60 %".to_string(),
                "pvmove /dev/sda1 /dev/sdb1: Finished".to_string(),
            ]
        );
        assert_eq!(
            sink.lines_with_prefix("pvmove /dev/sda2 /dev/sdb2:"),
            vec![
                "pvmove /dev/sda2 /dev/sdb2: 30 %".to_string(),
                "pvmove /dev/sda2 /dev/sdb2: Finished".to_string(),
            ]
        );
    }

    #[test]
    fn test_reregistration_overwrites() {
        let (reporter, _sink) = reporter();
        let worker = WorkerId::new(1);

        reporter.register_action(worker, "pvmove /dev/sda1");
        reporter.register_action(worker, "pvmove /dev/sdb1");

        assert_eq!(
            reporter.action_for(worker),
            Some("pvmove /dev/sdb1".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "never reported started")]
    fn test_progress_for_unknown_task_panics() {
        let (reporter, _sink) = reporter();
        reporter.deliver(ProgressEvent::progress(TaskId::new(99), 10));
    }

    #[test]
    fn test_concurrent_streams_lose_no_updates() {
        let (reporter, sink) = reporter();
        const WORKERS: u64 = 8;

        std::thread::scope(|scope| {
            for n in 1..=WORKERS {
                let reporter = Arc::clone(&reporter);
                scope.spawn(move || {
                    let worker = WorkerId::new(n);
                    let task = TaskId::new(n);
                    reporter.register_action(worker, format!("pvmove /dev/unit{n}"));
                    reporter.deliver(ProgressEvent::started(task, worker, format!("unit {n}")));
                    for completion in 1..=100u8 {
                        reporter.deliver(ProgressEvent::progress(task, completion));
                    }
                });
            }
        });

        // per worker: one started line plus 100 distinct progress updates
        for n in 1..=WORKERS {
            let prefix = format!("pvmove /dev/unit{n}:");
            assert_eq!(sink.lines_with_prefix(&prefix).len(), 100);
        }
        assert_eq!(sink.len() as u64, WORKERS * 101);
    }

    proptest! {
        // Emitted progress lines equal the number of consecutive distinct
        // changes, starting from the initial value of 0.
        #[test]
        fn prop_dedup_matches_distinct_changes(
            values in proptest::collection::vec(0u8..=100, 0..64)
        ) {
            let (reporter, sink) = reporter();
            let task = TaskId::new(1);
            let worker = WorkerId::new(1);
            reporter.register_action(worker, "pvmove /dev/sda1");
            reporter.deliver(ProgressEvent::started(task, worker, "started"));

            let mut expected = 0usize;
            let mut last = 0u8;
            for value in &values {
                if *value != last {
                    expected += 1;
                    last = *value;
                }
                reporter.deliver(ProgressEvent::progress(task, *value));
            }

            // everything past the started line is a progress line
            prop_assert_eq!(sink.len() - 1, expected);
        }
    }
}
