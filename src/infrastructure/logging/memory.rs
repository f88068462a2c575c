//! In-memory capture of emitted lines

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::models::LogRecord;
use crate::domain::ports::RecordWriter;

/// Collects written lines for later inspection
///
/// Clones share the same buffer, so one handle can be given to a logger
/// while another is kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryWriter {
    /// Empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    /// Lines parsed back into records; lines that are not records are skipped
    pub fn records(&self) -> Vec<LogRecord> {
        self.buffer()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.buffer().clear();
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock leaves the Vec intact
        self.lines.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl RecordWriter for MemoryWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.buffer().push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let writer = MemoryWriter::new();
        let handle = writer.clone();
        writer.write_line("one").unwrap();
        writer.write_line("two").unwrap();

        assert_eq!(handle.lines(), vec!["one", "two"]);
        assert_eq!(handle.len(), 2);
        assert!(handle.records().is_empty());

        handle.clear();
        assert!(writer.is_empty());
    }
}
