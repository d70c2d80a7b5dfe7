//! Console Sink Adapters
//!
//! Implements the `LineSink` port: one adapter writing to standard output
//! and one collecting lines in memory for inspection.

use crate::domain::ports::LineSink;

/// Writes each line to standard output.
///
/// `println!` holds the stdout lock for the duration of one call, so each
/// line stays intact even when tasks emit concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Create a new stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl LineSink for StdoutSink {
    fn line(&self, text: &str) {
        println!("{text}");
    }
}

/// In-memory line collector.
///
/// Collects emitted lines for later inspection during tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: parking_lot::RwLock<Vec<String>>,
}

impl MemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.read().clone()
    }

    /// Get the count of collected lines.
    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    /// Check if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Clear all collected lines.
    pub fn clear(&self) {
        self.lines.write().clear();
    }

    /// Get the lines starting with a given prefix, in emission order.
    pub fn lines_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.lines
            .read()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl LineSink for MemorySink {
    fn line(&self, text: &str) {
        self.lines.write().push(text.to_string());
    }
}
