//! Configuration management for ktspec.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `ktspec.toml` file
//! 3. User config `~/.config/ktspec/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source scanning and recognition.
    pub discovery: DiscoveryConfig,

    /// Interactive explorer.
    pub explorer: ExplorerConfig,

    /// Run request rendering.
    pub run: RunConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ktspec.toml` (project local)
    /// 2. `~/.config/ktspec/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration for a project rooted at `root`.
    pub fn load_from(root: &Path) -> Result<Self, ConfigError> {
        let local = root.join(PROJECT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(size) = std::env::var("KTSPEC_MAX_FILE_SIZE") {
            if let Ok(n) = size.parse() {
                self.discovery.max_file_size = n;
            }
        }
        if let Ok(styles) = std::env::var("KTSPEC_DISABLED_STYLES") {
            self.discovery.disabled_styles = styles
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(command) = std::env::var("KTSPEC_GRADLE") {
            self.run.gradle_command = command;
        }

        if let Ok(filter) = std::env::var("KTSPEC_LOG") {
            self.logging.filter = filter;
        }
        if let Ok(file) = std::env::var("KTSPEC_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "discovery.extensions must list at least one extension".to_string(),
            ));
        }
        if self.explorer.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "explorer.tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Render this configuration as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        Config::default().to_toml()
    }
}

/// Source scanning and recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File extensions treated as Kotlin sources (without leading dot).
    pub extensions: Vec<String>,

    /// Directories excluded from project scans.
    pub exclude_dirs: Vec<String>,

    /// Build files that mark a module root.
    pub module_markers: Vec<String>,

    /// Files larger than this (in bytes) are not recognized.
    pub max_file_size: u64,

    /// Spec styles to switch off, by style name (e.g. "String Spec").
    pub disabled_styles: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            module_markers: DEFAULT_MODULE_MARKERS.iter().map(|s| s.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            disabled_styles: Vec::new(),
        }
    }
}

impl DiscoveryConfig {
    /// Check if a path carries one of the configured extensions.
    pub fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Interactive explorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Expand every node after a refresh.
    pub expand_all: bool,

    /// UI tick interval in milliseconds.
    pub tick_rate_ms: u64,

    /// Interval between change checks of open files, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            expand_all: true,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Run request configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Command used to launch Gradle.
    pub gradle_command: String,

    /// Gradle task that runs tests.
    pub test_task: String,

    /// Gradle task appended for coverage runs.
    pub coverage_task: String,

    /// Flag appended for debug runs.
    pub debug_flag: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gradle_command: DEFAULT_GRADLE_COMMAND.to_string(),
            test_task: DEFAULT_TEST_TASK.to_string(),
            coverage_task: DEFAULT_COVERAGE_TASK.to_string(),
            debug_flag: DEFAULT_DEBUG_FLAG.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive, used when `RUST_LOG` is unset.
    pub filter: String,

    /// Log file for the interactive explorer. Without one it does not log.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}
