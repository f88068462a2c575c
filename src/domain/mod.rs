//! Domain layer: pure logging types with no I/O

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{LogError, LogResult};
pub use models::*;
pub use ports::RecordWriter;
