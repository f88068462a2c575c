//! Levelog - leveled JSON logging
//!
//! Levelog writes one JSON record per line to the console and, optionally,
//! to a size/time rotated file. Records are filtered against a threshold
//! drawn from a fixed table of twelve levels, from TRACE (100) to FATAL
//! (1000). Timed operations wrap async work in start/stop records that
//! share a correlation id and carry the elapsed time and the outcome.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): levels, records, options, the writer port
//! - **Service Layer** (`services`): formatting, filtering, sinks, timing
//! - **Infrastructure Layer** (`infrastructure`): config loading, package
//!   metadata discovery, console/file/in-memory writers
//! - **CLI Layer** (`cli`): the `levelog` command line
//!
//! # Example
//!
//! ```no_run
//! use levelog::{Logger, LoggerOptions};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), levelog::LogError> {
//! let logger = Logger::from_env(&LoggerOptions::default())?;
//! logger.request(json!({ "method": "GET", "path": "/health" }));
//! logger.debug("not shown at the default REQUEST threshold");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

#[doc(hidden)]
pub use serde_json;

// Re-export commonly used types for convenience
pub use domain::errors::{LogError, LogResult};
pub use domain::models::{
    AppInfo, Level, LevelInput, LogRecord, LoggerConfig, LoggerOptions, OperationResult,
    RotationOptions, RotationPolicy,
};
pub use domain::ports::RecordWriter;
pub use infrastructure::config::ConfigLoader;
pub use infrastructure::logging::{MemoryWriter, RollingFileWriter, StderrWriter, StdoutWriter};
pub use infrastructure::metadata::PackageMetadata;
pub use services::{safe_clone, IntoLogArgs, Logger, LoggerBuilder};

/// Build a heterogeneous argument list for a logging call
///
/// Each argument is any `Serialize` value, copied into JSON.
///
/// ```
/// use levelog::log_args;
///
/// let args = log_args!("%s took %dms", "query", 12);
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! log_args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::safe_clone(&$arg)),+]
    };
}
