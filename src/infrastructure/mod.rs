//! Infrastructure layer module
//!
//! Collaborators of the logging core:
//! - Configuration loading (figment)
//! - Package metadata discovery
//! - Console, rolling file and in-memory writers
//!
//! Writers implement the `RecordWriter` port defined in the domain layer.

pub mod config;
pub mod logging;
pub mod metadata;
