//! Record emission to console and file

use std::sync::Arc;
use tracing::warn;

use crate::domain::models::{Level, LogRecord};
use crate::domain::ports::RecordWriter;
use crate::infrastructure::logging::{render_pretty, StderrWriter, StdoutWriter};

/// Console streams: one for regular records, one for ERROR and above
#[derive(Clone)]
pub struct Console {
    out: Arc<dyn RecordWriter>,
    err: Arc<dyn RecordWriter>,
}

impl Console {
    /// Streams for regular records and for ERROR and above
    pub fn new(out: Arc<dyn RecordWriter>, err: Arc<dyn RecordWriter>) -> Self {
        Self { out, err }
    }

    /// Standard output and standard error
    pub fn std() -> Self {
        Self::new(Arc::new(StdoutWriter), Arc::new(StderrWriter))
    }

    fn stream_for(&self, level: Level) -> &dyn RecordWriter {
        if level >= Level::Error {
            self.err.as_ref()
        } else {
            self.out.as_ref()
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::std()
    }
}

/// Writes serialized records to the console and an optional file
#[derive(Clone)]
pub struct Sink {
    pretty: bool,
    quiet: bool,
    console: Console,
    file: Option<Arc<dyn RecordWriter>>,
}

impl Sink {
    /// Sink over `console` and an optional file writer
    pub fn new(
        pretty: bool,
        quiet: bool,
        console: Console,
        file: Option<Arc<dyn RecordWriter>>,
    ) -> Self {
        Self {
            pretty,
            quiet,
            console,
            file,
        }
    }

    /// Whether records are also written to a file
    pub const fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Emit a record; `None` is a no-op
    ///
    /// Best effort: write failures are reported through `tracing` and
    /// never reach the caller.
    pub fn emit(&self, record: Option<&LogRecord>) {
        let Some(record) = record else {
            return;
        };
        let line = record.to_json_line();

        if !self.quiet {
            let stream = self.console.stream_for(record.level);
            let written = if self.pretty {
                stream.write_line(&render_pretty(record))
            } else {
                stream.write_line(&line)
            };
            if let Err(e) = written {
                warn!(error = %e, level = %record.level, "failed to write log record to console");
            }
        }

        if let Some(file) = &self.file {
            if let Err(e) = file.write_line(&line) {
                warn!(error = %e, level = %record.level, "failed to write log record to file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::MemoryWriter;
    use chrono::Utc;
    use serde_json::json;
    use std::io;

    struct FailingWriter;

    impl RecordWriter for FailingWriter {
        fn write_line(&self, _line: &str) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    struct Harness {
        out: MemoryWriter,
        err: MemoryWriter,
        file: MemoryWriter,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                out: MemoryWriter::new(),
                err: MemoryWriter::new(),
                file: MemoryWriter::new(),
            }
        }

        fn sink(&self, pretty: bool, quiet: bool, with_file: bool) -> Sink {
            let console = Console::new(Arc::new(self.out.clone()), Arc::new(self.err.clone()));
            let file: Option<Arc<dyn RecordWriter>> =
                with_file.then(|| Arc::new(self.file.clone()) as Arc<dyn RecordWriter>);
            Sink::new(pretty, quiet, console, file)
        }
    }

    fn record(level: Level) -> LogRecord {
        LogRecord {
            level,
            logged: Utc::now(),
            application: "svc@1.0.0/b".to_string(),
            detail: json!({ "message": "m" }),
            id: None,
            result: None,
        }
    }

    #[test]
    fn test_none_is_noop() {
        let h = Harness::new();
        h.sink(false, false, true).emit(None);
        assert!(h.out.is_empty());
        assert!(h.err.is_empty());
        assert!(h.file.is_empty());
    }

    #[test]
    fn test_console_stream_follows_record_severity() {
        let h = Harness::new();
        let sink = h.sink(false, false, false);
        sink.emit(Some(&record(Level::Warn)));
        sink.emit(Some(&record(Level::Error)));
        sink.emit(Some(&record(Level::Fatal)));

        assert_eq!(h.out.records().len(), 1);
        assert_eq!(h.err.records().len(), 2);
        assert_eq!(h.err.records()[1].level, Level::Fatal);
    }

    #[test]
    fn test_quiet_still_writes_file() {
        let h = Harness::new();
        let sink = h.sink(false, true, true);
        let rec = record(Level::Info);
        sink.emit(Some(&rec));

        assert!(h.out.is_empty());
        assert_eq!(h.file.lines(), vec![rec.to_json_line()]);
    }

    #[test]
    fn test_pretty_console_keeps_json_in_file() {
        let h = Harness::new();
        let sink = h.sink(true, false, true);
        sink.emit(Some(&record(Level::Request)));

        let console_line = &h.out.lines()[0];
        assert!(serde_json::from_str::<serde_json::Value>(console_line).is_err());
        assert!(console::strip_ansi_codes(console_line).contains("REQUEST svc@1.0.0/b"));
        assert_eq!(h.file.records().len(), 1);
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let console = Console::new(Arc::new(FailingWriter), Arc::new(FailingWriter));
        let sink = Sink::new(false, false, console, Some(Arc::new(FailingWriter)));
        sink.emit(Some(&record(Level::Error)));
        assert!(sink.has_file());
    }
}
