//! Shared fixtures for the integration tests

use std::sync::Arc;

use levelog::{Logger, LoggerConfig, LoggerOptions, MemoryWriter};
use tempfile::TempDir;

/// Logger with captured stdout/stderr
#[allow(dead_code)]
pub struct Captured {
    pub logger: Logger,
    pub out: MemoryWriter,
    pub err: MemoryWriter,
}

/// Logger at `level` writing to in-memory console streams
pub fn captured(level: &str) -> Captured {
    captured_with(LoggerOptions::default().with_level(level))
}

pub fn captured_with(options: LoggerOptions) -> Captured {
    let out = MemoryWriter::new();
    let err = MemoryWriter::new();
    let logger = Logger::builder(LoggerConfig::resolve(&options, None))
        .console(Arc::new(out.clone()), Arc::new(err.clone()))
        .build()
        .expect("logger should build");
    Captured { logger, out, err }
}

/// Temporary directory for file sink tests
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Install a test subscriber so logger diagnostics show up with --nocapture
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
