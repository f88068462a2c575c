//! Configuration management infrastructure
//!
//! Hierarchical logger options using figment:
//! - Programmatic defaults
//! - Optional YAML file
//! - `LOG_*` environment variables
//! - Explicit options from the caller

pub mod loader;

pub use loader::ConfigLoader;
