use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::level::{Level, LevelInput};

/// Application name when none is configured or discovered
pub const DEFAULT_APP_NAME: &str = "unknown-application";
/// Application version when none is configured or discovered
pub const DEFAULT_APP_VERSION: &str = "0.0.0";
/// Build identifier when none is configured or discovered
pub const DEFAULT_APP_BUILD: &str = "unknown-build";

/// 500 MiB
pub const DEFAULT_BYTE_LIMIT: u64 = 500 * 1024 * 1024;
/// One day
pub const DEFAULT_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Logger options as supplied by callers, files and the environment
///
/// Every field is optional; `None` means "not specified here" so that
/// layered sources can be merged before resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerOptions {
    /// Directory for the rolling log file; enables the file sink
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Human-readable console output
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Suppress console output
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,

    /// Minimum severity (name or number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelInput>,

    /// Application identity; unset fields fall back to package metadata
    #[serde(default, skip_serializing_if = "AppInfo::is_empty")]
    pub app: AppInfo,

    /// File rotation triggers
    #[serde(default, skip_serializing_if = "RotationOptions::is_empty")]
    pub rotation: RotationOptions,
}

impl LoggerOptions {
    /// Set the minimum level (name or severity)
    pub fn with_level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable the file sink in `path`
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Toggle human-readable console output
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Toggle console suppression
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// Set the application identity
    pub fn with_app(mut self, app: AppInfo) -> Self {
        self.app = app;
        self
    }
}

/// Application identity fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Application name
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Application version
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Build identifier, such as a CI build number
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
}

impl AppInfo {
    /// Identity with every field set
    pub fn new(name: impl Into<String>, version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            build: Some(build.into()),
        }
    }

    /// Whether no field is set
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_none() && self.build.is_none()
    }

    /// Field-wise fallback: values present on `self` win
    pub fn or(self, fallback: Self) -> Self {
        Self {
            name: self.name.or(fallback.name),
            version: self.version.or(fallback.version),
            build: self.build.or(fallback.build),
        }
    }
}

/// Rotation settings for the file sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationOptions {
    /// Rotate once the active file reaches this many bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_limit: Option<u64>,

    /// Rotate once the active file has been open this long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
}

impl RotationOptions {
    /// Whether neither trigger is set
    pub const fn is_empty(&self) -> bool {
        self.byte_limit.is_none() && self.interval_secs.is_none()
    }
}

/// Resolved rotation policy; `None` disables that trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate at this many bytes
    pub byte_limit: Option<u64>,
    /// Rotate after the file has been open this long
    pub interval: Option<Duration>,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            byte_limit: Some(DEFAULT_BYTE_LIMIT),
            interval: Some(Duration::from_secs(DEFAULT_INTERVAL_SECS)),
        }
    }
}

impl From<&RotationOptions> for RotationPolicy {
    fn from(options: &RotationOptions) -> Self {
        let defaults = Self::default();
        // Zero turns a trigger off
        Self {
            byte_limit: options
                .byte_limit
                .map_or(defaults.byte_limit, |limit| (limit > 0).then_some(limit)),
            interval: options.interval_secs.map_or(defaults.interval, |secs| {
                (secs > 0).then(|| Duration::from_secs(secs))
            }),
        }
    }
}

/// Configuration a logger is built from
///
/// Immutable after construction except for the threshold, which the
/// logger keeps in its own atomic cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Directory of the rolling file; `None` disables the file sink
    pub path: Option<PathBuf>,
    /// Human-readable console output
    pub pretty: bool,
    /// No console output
    pub quiet: bool,
    /// Initial threshold
    pub level: Level,
    /// Application name, also the rolling file name
    pub app_name: String,
    /// `name@version/build`
    pub application: String,
    /// Rotation triggers for the file sink
    pub rotation: RotationPolicy,
}

impl LoggerConfig {
    /// Resolve merged options against discovered package metadata
    ///
    /// Application fields fall back explicit → discovered → built-in
    /// defaults. A missing or unparsable level becomes REQUEST.
    pub fn resolve(options: &LoggerOptions, discovered: Option<AppInfo>) -> Self {
        let app = options.app.clone().or(discovered.unwrap_or_default());
        let name = app.name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let version = app.version.unwrap_or_else(|| DEFAULT_APP_VERSION.to_string());
        let build = app.build.unwrap_or_else(|| DEFAULT_APP_BUILD.to_string());

        let level = options
            .level
            .as_ref()
            .and_then(LevelInput::resolve)
            .unwrap_or(Level::Request);

        Self {
            path: options
                .path
                .clone()
                .filter(|path| !path.as_os_str().is_empty()),
            pretty: options.pretty.unwrap_or(false),
            quiet: options.quiet.unwrap_or(false),
            level,
            application: format!("{name}@{version}/{build}"),
            app_name: name,
            rotation: RotationPolicy::from(&options.rotation),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::resolve(&LoggerOptions::default(), None)
    }
}

/// Lenient boolean: accepts booleans, integers and common words
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|raw| match raw {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Text(text) => !matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
    }))
}

/// Lenient text: numbers and booleans are taken as their string form
///
/// Typed sources read `build: 42` or `version: 2.0` as numbers; both are
/// still identifiers here.
fn text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|raw| {
        T::from(match raw {
            Text::Str(s) => s,
            Text::Int(n) => n.to_string(),
            Text::UInt(n) => n.to_string(),
            Text::Float(n) => format!("{n:?}"),
            Text::Bool(b) => b.to_string(),
        })
    }))
}
