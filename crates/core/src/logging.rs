//! Unified logging and observability.
//!
//! Logging goes through the tracing ecosystem, with an optional daily-rolling
//! JSON file next to the (optional) stderr output.
//!
//! # Environment Variables
//!
//! - `CHATLINE_LOG`: Filter directive (like `RUST_LOG`), e.g., `chatline_core=debug`
//! - `CHATLINE_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `CHATLINE_LOG_DIR`: Directory for log files (default `~/.chatline/logs`)
//!
//! # Configuration
//!
//! Logging is configured via the `[logging]` section in `chatline.toml`:
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "compact"
//!
//! [logging.file]
//! enabled = false
//! level = "debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chatline_core::logging;
//!
//! let _guard = logging::init_logging(None)?;
//! # Ok::<(), chatline_core::Error>(())
//! ```

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    #[default]
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    /// Get the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Runtime logging settings, built from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter for stderr output.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Write to stderr at all. Disabled while the TUI owns the terminal.
    pub stderr: bool,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), stderr: true, file: None }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        Self {
            level: config.level,
            format: LogFormat::parse_str(&config.format).unwrap_or_default(),
            stderr: true,
            file: if config.file.enabled { Some(config.file) } else { None },
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable stderr output.
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Enable file logging.
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Filter directive: `CHATLINE_LOG`, then `RUST_LOG`, then the configured level.
    fn filter_directive(&self) -> String {
        env::var("CHATLINE_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone())
    }

    /// Detect if stderr is a TTY for pretty formatting.
    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the format for stderr output. The environment wins, and
    /// pretty output falls back to compact when stderr is not a terminal.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("CHATLINE_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        match self.format {
            LogFormat::Pretty if !Self::is_tty() => LogFormat::Compact,
            format => format,
        }
    }

    /// Get the log directory path.
    fn log_dir(file: &FileLoggingConfig) -> Result<PathBuf, Error> {
        if let Some(dir) = &file.directory {
            return Ok(dir.clone());
        }

        if let Ok(custom_dir) = env::var("CHATLINE_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".chatline").join("logs"))
    }

    fn stderr_layer(&self) -> BoxedLayer {
        let filter = EnvFilter::new(self.filter_directive());
        match self.detect_format() {
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Sets up an optional stderr layer (pretty, json, or compact) and an
/// optional daily-rolling JSON file layer. The returned guard flushes the file
/// writer on drop and must be held for the life of the program.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.stderr {
        layers.push(config.stderr_layer());
    }

    if let Some(file_config) = &config.file {
        let log_dir = LoggingConfig::log_dir(file_config)?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "chatline.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        layers.push(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(&file_config.level))
                .boxed(),
        );
        guard = Some(worker_guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Shorten message text for log fields.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() { format!("{}... ({} total chars)", head, text.chars().count()) } else { head }
}
