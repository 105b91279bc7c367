use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Autoscroll tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoscrollConfig {
    /// Distance from the bottom (rows/px) still considered pinned
    pub threshold: f64,
    /// Coalescing window for live-text scrolls
    pub debounce_ms: u64,
    /// Frames used by the smooth scroll animation
    pub smooth_steps: u16,
}

impl AutoscrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutoscrollConfig {
    fn default() -> Self {
        Self { threshold: 100.0, debounce_ms: 50, smooth_steps: 4 }
    }
}

/// Pacing of the scripted demo conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Pause before the welcome message
    pub initial_delay_ms: u64,
    /// Pause between a user message and the typing indicator
    pub reply_delay_ms: u64,
    /// How long the bot "types" before answering
    pub typing_delay_ms: u64,
    /// Pause between streamed chunks
    pub chunk_delay_ms: u64,
    /// Pause between the last chunk and the final message
    pub finalize_delay_ms: u64,
    /// Pause before a follow-up message
    pub follow_up_delay_ms: u64,
    /// Words per streamed chunk
    pub words_per_chunk: usize,
}

impl DemoConfig {
    /// Every delay set to zero, for tests and replays
    pub fn instant() -> Self {
        Self {
            initial_delay_ms: 0,
            reply_delay_ms: 0,
            typing_delay_ms: 0,
            chunk_delay_ms: 0,
            finalize_delay_ms: 0,
            follow_up_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1500,
            reply_delay_ms: 300,
            typing_delay_ms: 1200,
            chunk_delay_ms: 120,
            finalize_delay_ms: 100,
            follow_up_delay_ms: 600,
            words_per_chunk: 4,
        }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// Log directory (default: `~/.chatline/logs`)
    pub directory: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string(), directory: None }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for chatline.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub autoscroll: AutoscrollConfig,
    pub demo: DemoConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| crate::Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        use crate::Error;

        let threshold = self.autoscroll.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::Config(ConfigError::InvalidThreshold(threshold).to_string()));
        }

        if self.autoscroll.debounce_ms == 0 {
            return Err(Error::Config(ConfigError::ZeroValue("autoscroll.debounce_ms").to_string()));
        }

        if self.autoscroll.smooth_steps == 0 {
            return Err(Error::Config(ConfigError::ZeroValue("autoscroll.smooth_steps").to_string()));
        }

        if self.demo.words_per_chunk == 0 {
            return Err(Error::Config(ConfigError::ZeroValue("demo.words_per_chunk").to_string()));
        }

        if crate::logging::LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(Error::Config(
                ConfigError::InvalidLogFormat(self.logging.format.clone()).to_string(),
            ));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Chatline Configuration Example
# Every key is optional; omitted keys use the defaults shown here.

[autoscroll]
# Distance from the bottom still treated as "pinned"
threshold = 100.0
# Coalescing window for scrolls caused by streamed text
debounce_ms = 50
# Frames used when animating a smooth scroll
smooth_steps = 4

[demo]
initial_delay_ms = 1500
reply_delay_ms = 300
typing_delay_ms = 1200
chunk_delay_ms = 120
finalize_delay_ms = 100
follow_up_delay_ms = 600
words_per_chunk = 4

[logging]
# Filter directive, overridden by CHATLINE_LOG / RUST_LOG
level = "warn"
# Output format: "pretty", "json", or "compact"
format = "compact"

[logging.file]
enabled = false
level = "debug"
# directory = "/var/log/chatline"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Negative or non-finite pin threshold
    #[error("invalid autoscroll threshold: {0}")]
    InvalidThreshold(f64),

    /// A value that must be positive is zero
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    /// Unknown log format
    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
