//! The logger handed to callers
//!
//! One method per level, raw/format-only entry points, a live threshold,
//! and the two timed-operation helpers.

use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Debug, Display};
use std::future::{Future, IntoFuture};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::formatter::MessageFormatter;
use super::sink::{Console, Sink};
use super::timed_operation::TimedOperation;
use crate::domain::errors::LogResult;
use crate::domain::models::{Level, LevelInput, LogRecord, LoggerConfig, LoggerOptions};
use crate::domain::ports::RecordWriter;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::RollingFileWriter;
use crate::infrastructure::metadata::PackageMetadata;

/// Conversion into the argument list of a logging call
///
/// A single string or value is one argument; vectors, slices and arrays
/// are several. Use [`log_args!`](crate::log_args) for mixed types.
pub trait IntoLogArgs {
    fn into_log_args(self) -> Vec<Value>;
}

impl IntoLogArgs for &str {
    fn into_log_args(self) -> Vec<Value> {
        vec![Value::String(self.to_string())]
    }
}

impl IntoLogArgs for String {
    fn into_log_args(self) -> Vec<Value> {
        vec![Value::String(self)]
    }
}

impl IntoLogArgs for Value {
    fn into_log_args(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoLogArgs for Vec<Value> {
    fn into_log_args(self) -> Vec<Value> {
        self
    }
}

impl IntoLogArgs for &[Value] {
    fn into_log_args(self) -> Vec<Value> {
        self.to_vec()
    }
}

impl<const N: usize> IntoLogArgs for [Value; N] {
    fn into_log_args(self) -> Vec<Value> {
        self.into()
    }
}

struct LoggerInner {
    config: LoggerConfig,
    threshold: AtomicU16,
    formatter: MessageFormatter,
    sink: Sink,
}

/// Leveled JSON logger
///
/// Cheap to clone; clones share configuration, threshold and writers.
///
/// # Examples
///
/// ```no_run
/// use levelog::{log_args, Logger, LoggerOptions};
///
/// # async fn demo() -> anyhow::Result<()> {
/// let logger = Logger::from_env(&LoggerOptions::default().with_level("info"))?;
/// logger.info("service started");
/// logger.warn(log_args!("%d retries left", 2));
///
/// let rows = logger
///     .time_request("load rows", || async { Ok::<_, anyhow::Error>(vec![1, 2, 3]) })
///     .await?;
/// logger.info(format!("loaded {} rows", rows.len()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Logger writing to stdout/stderr and, when `config.path` is set, a
    /// rolling file named after the application
    pub fn new(config: LoggerConfig) -> LogResult<Self> {
        Self::builder(config).build()
    }

    /// Resolve options from the environment and the nearest `Cargo.toml`,
    /// then build a logger
    pub fn from_env(explicit: &LoggerOptions) -> LogResult<Self> {
        let options = ConfigLoader::load(explicit)?;
        let discovered = PackageMetadata::discover_from_cwd();
        Self::new(LoggerConfig::resolve(&options, discovered))
    }

    /// Start a builder to override the console or file writers
    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder {
            config,
            console: None,
            file: None,
        }
    }

    /// Configuration the logger was built from
    ///
    /// The threshold here is the initial one; see [`Logger::level`].
    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// The level table, most severe first
    pub const fn levels(&self) -> &'static [Level] {
        &Level::ALL
    }

    /// Current threshold
    pub fn level(&self) -> Level {
        Level::from_severity(i64::from(self.inner.threshold.load(Ordering::Relaxed)))
            .unwrap_or(Level::Request)
    }

    /// Change the threshold; unrecognized input leaves it unchanged
    ///
    /// Returns the threshold in effect afterwards.
    pub fn set_level(&self, level: impl Into<LevelInput>) -> Level {
        let input = level.into();
        match input.resolve() {
            Some(level) => {
                self.inner.threshold.store(level.severity(), Ordering::Relaxed);
                debug!(%level, "log level changed");
                level
            }
            None => {
                debug!(%input, "ignoring unrecognized log level");
                self.level()
            }
        }
    }

    /// Build a record without emitting it
    pub fn format(&self, level: impl Into<LevelInput>, args: impl IntoLogArgs) -> Option<LogRecord> {
        self.inner
            .formatter
            .format(self.level(), level, &args.into_log_args())
    }

    /// Format and emit at an explicit level
    pub fn log_raw(&self, level: impl Into<LevelInput>, args: impl IntoLogArgs) {
        self.inner.sink.emit(self.format(level, args).as_ref());
    }

    /// Alias for [`Logger::info`]
    pub fn log(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Info, args);
    }

    /// Unrecoverable failure; written to stderr
    pub fn fatal(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Fatal, args);
    }

    /// Failure; written to stderr
    pub fn error(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Error, args);
    }

    /// A component or process started
    pub fn start(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Start, args);
    }

    /// A component or process stopped
    pub fn stop(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Stop, args);
    }

    /// Response produced for an inbound request
    pub fn response(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Response, args);
    }

    /// Inbound request handled by this application
    pub fn request(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Request, args);
    }

    /// Potentially problematic situation
    pub fn warn(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Warn, args);
    }

    /// Normal operational message
    ///
    /// ```
    /// use std::sync::Arc;
    /// use levelog::{Logger, LoggerConfig, MemoryWriter};
    ///
    /// let out = MemoryWriter::new();
    /// let config = LoggerConfig { level: levelog::Level::Info, ..LoggerConfig::default() };
    /// let logger = Logger::builder(config)
    ///     .console(Arc::new(out.clone()), Arc::new(out.clone()))
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.info("ready");
    /// assert_eq!(out.records()[0].detail["message"], "ready");
    /// ```
    pub fn info(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Info, args);
    }

    /// Response received for an outbound request
    pub fn client_response(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::ClientResponse, args);
    }

    /// Outbound request issued by this application
    pub fn client_request(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::ClientRequest, args);
    }

    /// Development diagnostics
    pub fn debug(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Debug, args);
    }

    /// Most verbose output
    pub fn trace(&self, args: impl IntoLogArgs) {
        self.log_raw(Level::Trace, args);
    }

    /// Time handling of an inbound request (REQUEST / RESPONSE records)
    pub fn time_request<L, F, Fut, T, E>(&self, label: L, work: F) -> impl Future<Output = Result<T, E>>
    where
        L: Serialize,
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<T, E>>,
        T: Serialize,
        E: Display + Debug,
    {
        TimedOperation::new(self.clone(), Level::Request, Level::Response).run(label, work)
    }

    /// Time an outbound call (CLIENTREQUEST / CLIENTRESPONSE records)
    pub fn time_client_request<L, F, Fut, T, E>(
        &self,
        label: L,
        work: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        L: Serialize,
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<T, E>>,
        T: Serialize,
        E: Display + Debug,
    {
        TimedOperation::new(self.clone(), Level::ClientRequest, Level::ClientResponse)
            .run(label, work)
    }

    pub(crate) fn formatter(&self) -> &MessageFormatter {
        &self.inner.formatter
    }

    pub(crate) fn sink(&self) -> &Sink {
        &self.inner.sink
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("application", &self.inner.config.application)
            .field("level", &self.level())
            .field("pretty", &self.inner.config.pretty)
            .field("quiet", &self.inner.config.quiet)
            .field("file", &self.inner.sink.has_file())
            .finish()
    }
}

/// Overrides the writers a logger would otherwise open itself
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Option<Console>,
    file: Option<Arc<dyn RecordWriter>>,
}

impl LoggerBuilder {
    /// Replace stdout/stderr
    pub fn console(mut self, out: Arc<dyn RecordWriter>, err: Arc<dyn RecordWriter>) -> Self {
        self.console = Some(Console::new(out, err));
        self
    }

    /// Replace the rolling file, whether or not `path` is configured
    pub fn file_writer(mut self, writer: Arc<dyn RecordWriter>) -> Self {
        self.file = Some(writer);
        self
    }

    /// Open the rolling file when a path is configured and assemble the logger
    pub fn build(self) -> LogResult<Logger> {
        let Self {
            config,
            console,
            file,
        } = self;

        let file = match (file, &config.path) {
            (Some(writer), _) => Some(writer),
            (None, Some(path)) => Some(Arc::new(RollingFileWriter::new(
                path,
                &config.app_name,
                config.rotation,
            )?) as Arc<dyn RecordWriter>),
            (None, None) => None,
        };

        let sink = Sink::new(
            config.pretty,
            config.quiet,
            console.unwrap_or_default(),
            file,
        );

        debug!(
            application = %config.application,
            level = %config.level,
            pretty = config.pretty,
            quiet = config.quiet,
            file_output = sink.has_file(),
            "logger initialized"
        );

        Ok(Logger {
            inner: Arc::new(LoggerInner {
                threshold: AtomicU16::new(config.level.severity()),
                formatter: MessageFormatter::new(config.application.clone()),
                sink,
                config,
            }),
        })
    }
}
