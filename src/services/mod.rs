//! Logging core
//!
//! - `formatter`: record construction, threshold filtering, message rendering
//! - `sanitize`: bounded JSON snapshots and stack stripping
//! - `sink`: console and file emission
//! - `timed_operation`: start/stop records around async work
//! - `logger`: the facade tying them together

pub mod bounded;
pub mod formatter;
pub mod logger;
pub mod sanitize;
pub mod sink;
pub mod timed_operation;

pub use formatter::MessageFormatter;
pub use logger::{IntoLogArgs, Logger, LoggerBuilder};
pub use sanitize::safe_clone;
pub use sink::{Console, Sink};
pub use timed_operation::TimedOperation;
