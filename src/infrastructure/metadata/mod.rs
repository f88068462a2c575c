//! Package metadata discovery
//!
//! Supplies the default application identity (name, version, build) by
//! reading the nearest `Cargo.toml`.

pub mod package;

pub use package::PackageMetadata;
