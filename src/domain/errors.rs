//! Error types for logger construction and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a logger
///
/// Logging calls themselves never fail; these only surface from
/// constructors and loaders.
#[derive(Debug, Error)]
pub enum LogError {
    /// A directory or log file could not be created or opened
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options could not be extracted from YAML or the environment
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A `Cargo.toml` could not be parsed
    #[error("Invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl LogError {
    /// I/O failure on `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<figment::Error> for LogError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Result alias for logger construction
pub type LogResult<T> = Result<T, LogError>;
