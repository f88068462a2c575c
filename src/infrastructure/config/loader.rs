use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use tracing::debug;

use crate::domain::errors::LogResult;
use crate::domain::models::LoggerOptions;

/// Prefix of the environment variables read as defaults
pub const ENV_PREFIX: &str = "LOG_";

/// Variables whose values are identifiers, taken verbatim rather than typed
const TEXT_VARS: [(&str, &str); 4] = [
    ("LOG_PATH", "path"),
    ("LOG_APP__NAME", "app.name"),
    ("LOG_APP__VERSION", "app.version"),
    ("LOG_APP__BUILD", "app.build"),
];

/// Loads logger options with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge environment defaults under explicit options
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (everything unset)
    /// 2. Environment variables (`LOG_PATH`, `LOG_PRETTY`, `LOG_QUIET`,
    ///    `LOG_LEVEL`; nested keys via `__`, e.g. `LOG_APP__NAME`)
    /// 3. `explicit`, for every field it sets
    pub fn load(explicit: &LoggerOptions) -> LogResult<LoggerOptions> {
        let options: LoggerOptions = Self::base()
            .merge(Self::env())
            .merge(Serialized::defaults(explicit))
            .extract()?;

        debug!(?options, "resolved logger options");
        Ok(options)
    }

    /// Like [`ConfigLoader::load`] with a YAML file between the defaults
    /// and the environment. A missing file contributes nothing.
    pub fn load_from_file(path: impl AsRef<Path>, explicit: &LoggerOptions) -> LogResult<LoggerOptions> {
        let options: LoggerOptions = Self::base()
            .merge(Yaml::file(path.as_ref()))
            .merge(Self::env())
            .merge(Serialized::defaults(explicit))
            .extract()?;

        debug!(path = %path.as_ref().display(), ?options, "resolved logger options");
        Ok(options)
    }

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(LoggerOptions::default()))
    }

    /// Typed `LOG_*` values, with identifier variables kept as written so
    /// that `LOG_APP__VERSION=2.10` stays `"2.10"`
    fn env() -> Figment {
        TEXT_VARS.iter().fold(
            Figment::from(Env::prefixed(ENV_PREFIX).split("__")),
            |figment, &(var, key)| match std::env::var(var) {
                Ok(raw) => figment.merge(Serialized::default(key, raw)),
                Err(_) => figment,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AppInfo, LevelInput};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const VARS: [&str; 7] = [
        "LOG_PATH",
        "LOG_PRETTY",
        "LOG_QUIET",
        "LOG_LEVEL",
        "LOG_APP__NAME",
        "LOG_APP__VERSION",
        "LOG_APP__BUILD",
    ];

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset(VARS, f)
    }

    #[test]
    fn test_load_with_nothing_set() {
        let options = without_env(|| ConfigLoader::load(&LoggerOptions::default()).unwrap());
        assert_eq!(options, LoggerOptions::default());
    }

    #[test]
    fn test_env_supplies_defaults() {
        let options = temp_env::with_vars(
            [
                ("LOG_PATH", Some("/var/log/svc")),
                ("LOG_PRETTY", Some("true")),
                ("LOG_QUIET", Some("0")),
                ("LOG_LEVEL", Some("debug")),
                ("LOG_APP__NAME", Some("from-env")),
            ],
            || ConfigLoader::load(&LoggerOptions::default()).unwrap(),
        );

        assert_eq!(options.path, Some(PathBuf::from("/var/log/svc")));
        assert_eq!(options.pretty, Some(true));
        assert_eq!(options.quiet, Some(false));
        assert_eq!(
            options.level.as_ref().and_then(LevelInput::resolve),
            Some(crate::Level::Debug)
        );
        assert_eq!(options.app.name.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_numeric_identity_vars_stay_verbatim() {
        let options = temp_env::with_vars(
            [
                ("LOG_PATH", Some("2024")),
                ("LOG_APP__NAME", Some("svc")),
                ("LOG_APP__VERSION", Some("2.10")),
                ("LOG_APP__BUILD", Some("42")),
            ],
            || ConfigLoader::load(&LoggerOptions::default()).unwrap(),
        );

        assert_eq!(options.path, Some(PathBuf::from("2024")));
        assert_eq!(options.app, AppInfo::new("svc", "2.10", "42"));
    }

    #[test]
    fn test_numeric_env_level() {
        let options = temp_env::with_vars([("LOG_LEVEL", Some("900"))], || {
            ConfigLoader::load(&LoggerOptions::default()).unwrap()
        });
        assert_eq!(
            options.level.as_ref().and_then(LevelInput::resolve),
            Some(crate::Level::Error)
        );
    }

    #[test]
    fn test_explicit_options_win_over_env() {
        let explicit = LoggerOptions::default()
            .with_level("warn")
            .with_quiet(true)
            .with_app(AppInfo {
                name: Some("explicit".to_string()),
                ..AppInfo::default()
            });

        let options = temp_env::with_vars(
            [
                ("LOG_LEVEL", Some("trace")),
                ("LOG_QUIET", Some("false")),
                ("LOG_PRETTY", Some("yes")),
                ("LOG_APP__NAME", Some("from-env")),
            ],
            || ConfigLoader::load(&explicit).unwrap(),
        );

        assert_eq!(options.level, Some(LevelInput::Name("warn".to_string())));
        assert_eq!(options.quiet, Some(true));
        assert_eq!(options.pretty, Some(true), "unset explicit fields keep env values");
        assert_eq!(options.app.name.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_yaml_file_sits_below_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "level: info\npretty: true\napp:\n  name: from-file\n  build: b9\nrotation:\n  byte_limit: 1024"
        )
        .unwrap();
        file.flush().unwrap();

        let options = temp_env::with_vars(
            [
                ("LOG_LEVEL", Some("error")),
                ("LOG_PATH", None),
                ("LOG_PRETTY", None),
                ("LOG_QUIET", None),
                ("LOG_APP__NAME", None),
            ],
            || ConfigLoader::load_from_file(file.path(), &LoggerOptions::default()).unwrap(),
        );

        assert_eq!(options.level, Some(LevelInput::Name("error".to_string())));
        assert_eq!(options.pretty, Some(true));
        assert_eq!(options.app.name.as_deref(), Some("from-file"));
        assert_eq!(options.app.build.as_deref(), Some("b9"));
        assert_eq!(options.rotation.byte_limit, Some(1024));
    }

    #[test]
    fn test_missing_yaml_file_is_ignored() {
        let options = without_env(|| {
            ConfigLoader::load_from_file("/definitely/not/here.yaml", &LoggerOptions::default())
                .unwrap()
        });
        assert_eq!(options, LoggerOptions::default());
    }

    #[test]
    fn test_malformed_yaml_is_a_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "rotation: [not, a, table]").unwrap();
        file.flush().unwrap();

        let result = without_env(|| ConfigLoader::load_from_file(file.path(), &LoggerOptions::default()));
        assert!(matches!(result, Err(crate::LogError::Config(_))));
    }
}
