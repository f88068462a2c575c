//! Ports implemented by infrastructure adapters

pub mod writer;

pub use writer::RecordWriter;
