use std::io;
use std::sync::Arc;

/// Destination for serialized log lines
///
/// The sink hands every writer exactly one complete record per call,
/// already serialized and without a trailing newline. Implementations
/// must append lines in call order and be safe to share across tasks.
///
/// Adapters:
/// - console streams (`StdoutWriter`, `StderrWriter`)
/// - the size/time rotated file (`RollingFileWriter`)
/// - in-memory capture for tests (`MemoryWriter`)
pub trait RecordWriter: Send + Sync {
    /// Append one line
    fn write_line(&self, line: &str) -> io::Result<()>;
}

impl<W: RecordWriter + ?Sized> RecordWriter for Arc<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}
