//! Record writers
//!
//! Adapters for the `RecordWriter` port:
//! - Console streams and the pretty renderer
//! - Size/time rotated log file
//! - In-memory capture
pub mod console;
pub mod memory;
pub mod rotation;

pub use console::{render_pretty, StderrWriter, StdoutWriter};
pub use memory::MemoryWriter;
pub use rotation::RollingFileWriter;
