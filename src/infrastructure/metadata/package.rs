use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::errors::{LogError, LogResult};
use crate::domain::models::AppInfo;

const MANIFEST: &str = "Cargo.toml";

#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: Option<String>,
    version: Option<toml::Value>,
    #[serde(default)]
    metadata: Option<MetadataSection>,
}

#[derive(Debug, Deserialize)]
struct MetadataSection {
    build: Option<toml::Value>,
}

/// Reads application identity from `Cargo.toml`
///
/// `name` and `version` come from `[package]`, `build` from
/// `[package.metadata] build = "..."`. Workspace-inherited versions
/// (`version.workspace = true`) are not resolved and count as absent.
pub struct PackageMetadata;

impl PackageMetadata {
    /// Walk from `start` up to the filesystem root
    ///
    /// Returns the first manifest with a `[package]` table. Manifests that
    /// cannot be read or parsed are skipped.
    pub fn discover(start: impl AsRef<Path>) -> Option<AppInfo> {
        let mut directory: Option<&Path> = Some(start.as_ref());
        while let Some(dir) = directory {
            let candidate = dir.join(MANIFEST);
            if candidate.is_file() {
                match Self::read(&candidate) {
                    Ok(Some(info)) => {
                        debug!(path = %candidate.display(), "discovered package metadata");
                        return Some(info);
                    }
                    Ok(None) => {}
                    Err(e) => debug!(error = %e, "skipping unreadable manifest"),
                }
            }
            directory = dir.parent();
        }
        None
    }

    /// Start discovery at the current working directory
    pub fn discover_from_cwd() -> Option<AppInfo> {
        std::env::current_dir().ok().and_then(Self::discover)
    }

    /// Read a single manifest; `Ok(None)` when it has no `[package]` table
    pub fn read(path: impl AsRef<Path>) -> LogResult<Option<AppInfo>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| LogError::io(path, e))?;
        let manifest: Manifest = toml::from_str(&raw).map_err(|source| LogError::Manifest {
            path: PathBuf::from(path),
            source,
        })?;

        Ok(manifest.package.map(|package| AppInfo {
            name: package.name,
            version: package.version.and_then(string_value),
            build: package
                .metadata
                .and_then(|metadata| metadata.build)
                .and_then(string_value),
        }))
    }
}

fn string_value(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}
