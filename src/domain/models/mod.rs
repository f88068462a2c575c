//! Domain models: level table, log records and logger configuration

pub mod level;
pub mod options;
pub mod record;

pub use level::{Level, LevelInput};
pub use options::{AppInfo, LoggerConfig, LoggerOptions, RotationOptions, RotationPolicy};
pub use record::{LogRecord, OperationResult};
