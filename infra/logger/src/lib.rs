//! # Logger
//!
//! Structured logging for SkillChain Passport services.
//!
//! Console and rolling-file outputs are configured through a typestate builder:
//! file-only settings (`rotation`, `max_files`, `file_format`) exist only once
//! [`LoggerBuilder::path`] has been called. `RUST_LOG` is honoured unless an
//! explicit [`LoggerBuilder::env_filter`] is given.
//!
//! Secrets never go through this crate. Callers log error kinds
//! (`error.kind = err.kind()`) and public messages, not payloads.
//!
//! ## Example
//!
//! ```rust
//! # use skc_logger::{Logger, LevelFilter, LogFormat};
//!
//! let _logger = Logger::builder()
//!     .name("skc-server")
//!     .console(true)
//!     .console_format(LogFormat::Compact)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::settings::{LogFormat, parse_level, parse_rotation};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 14;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Debug)]
struct LoggerSettings {
    console: bool,
    console_format: LogFormat,
    path: Option<PathBuf>,
    file_format: LogFormat,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    env_filter: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            console: true,
            console_format: LogFormat::Compact,
            path: None,
            file_format: LogFormat::Compact,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    settings: LoggerSettings,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the service name; it prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            settings: self.settings,
            file_state: PhantomData,
        }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Maximum number of rotated files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Line format of the file output. `Pretty` is treated as `Compact` in files.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn file_format(mut self, format: LogFormat) -> Self {
        self.settings.file_format = format;
        self
    }

    /// Shorthand for `file_format(LogFormat::Json)`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(self) -> Self {
        self.file_format(LogFormat::Json)
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Minimum level emitted when no filter directive matches.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Adds an explicit filter (e.g., `skc_server=debug,tower_http=info`).
    ///
    /// When set, `RUST_LOG` is ignored. Invalid filters make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console_format(mut self, format: LogFormat) -> Self {
        self.settings.console_format = format;
        self
    }

    /// Directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut settings = self.settings;
        settings.path = Some(path.into());
        LoggerBuilder { settings, name: self.name, file_state: PhantomData }
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. It owns the [`WorkerGuard`] of the file writer and must
    /// be kept alive until shutdown so buffered lines are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    /// * [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate_settings(&self.settings, &self.name.0)?;

        let env_filter = build_env_filter(&self.settings)?;
        let mut layers = Vec::new();

        if self.settings.console {
            layers.push(console_layer(self.settings.console_format));
        }

        let guard = if let Some(path) = &self.settings.path {
            fs::create_dir_all(path)
                .context(format!("Creating log directory {}", path.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.settings.rotation.clone())
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.settings.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(match self.settings.file_format {
                LogFormat::Json => file_layer.json().boxed(),
                LogFormat::Compact | LogFormat::Pretty => file_layer.compact().boxed(),
            });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid(
                "No logging output enabled. Enable console or file output.",
            ));
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { name: self.name.0, guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background writer guard. Drop it only when the service shuts down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use skc_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("skc-cli")
    ///     .level(LevelFilter::WARN)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: LoggerSettings::default(), name: NoName, file_state: PhantomData }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file writer guard, present only when file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(service = %self.name, "Logging system shutting down, flushing buffers...");
        }
    }
}

fn console_layer<S>(format: LogFormat) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = layer().with_target(true);
    match format {
        LogFormat::Compact => base.compact().with_ansi(true).boxed(),
        LogFormat::Pretty => base.pretty().with_ansi(true).boxed(),
        LogFormat::Json => base.json().with_ansi(false).boxed(),
    }
}

fn validate_settings(settings: &LoggerSettings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::invalid("Logger name cannot be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(LoggerError::invalid(
            "Logger name is used as a file prefix and cannot contain path separators",
        ));
    }
    if settings.max_files == 0 {
        return Err(LoggerError::invalid("max_files must be greater than zero"));
    }
    Ok(())
}

fn build_env_filter(settings: &LoggerSettings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    settings.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_logger_builder_initial_state() {
        let builder = Logger::builder().name("skc-test").env_filter("skc=debug");
        assert!(builder.settings.console);
        assert_eq!(builder.settings.console_format, LogFormat::Compact);
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("skc=debug"));
        assert!(builder.settings.path.is_none());
    }

    #[test]
    #[serial]
    fn test_logger_builder_file_configuration() {
        let tmp_dir = tempdir().expect("temp dir");
        let log_dir = tmp_dir.path().join("logs");
        let builder = Logger::builder()
            .name("skc-test")
            .console(false)
            .path(log_dir.clone())
            .json()
            .rotation(Rotation::HOURLY)
            .max_files(5)
            .level(LevelFilter::DEBUG);

        assert!(!builder.settings.console);
        assert_eq!(builder.settings.file_format, LogFormat::Json);
        assert_eq!(builder.settings.rotation, Rotation::HOURLY);
        assert_eq!(builder.settings.max_files, 5);
        assert_eq!(builder.settings.path.as_deref(), Some(log_dir.as_path()));
    }

    #[test]
    #[serial]
    fn test_invalid_settings_are_rejected_before_install() {
        let no_output = Logger::builder().name("skc-test").console(false).init();
        assert!(matches!(no_output, Err(LoggerError::InvalidConfiguration { .. })));

        let blank = Logger::builder().name("  ").init();
        assert!(matches!(blank, Err(LoggerError::InvalidConfiguration { .. })));

        let separator = Logger::builder().name("../escape").init();
        assert!(matches!(separator, Err(LoggerError::InvalidConfiguration { .. })));

        let bad_filter = Logger::builder().name("skc-test").env_filter("skc=loud").init();
        assert!(matches!(bad_filter, Err(LoggerError::InvalidConfiguration { .. })));

        let tmp_dir = tempdir().expect("temp dir");
        let zero_files = Logger::builder().name("skc-test").path(tmp_dir.path()).max_files(0).init();
        assert!(matches!(zero_files, Err(LoggerError::InvalidConfiguration { .. })));
    }
}
