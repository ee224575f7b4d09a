//! Error types for spec discovery.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while loading and parsing Kotlin sources.
///
/// A node that does not match a style is never an error; recognition
/// reports absence with `None`.
#[derive(Debug, Error)]
pub enum KtSpecError {
    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Kotlin grammar could not be loaded into the parser.
    #[error("Failed to load Kotlin grammar: {0}")]
    Language(String),

    /// Tree-sitter gave up on the input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The file is larger than the configured limit.
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The file does not carry a Kotlin extension.
    #[error("Not a Kotlin source file: {0}")]
    UnsupportedFile(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl KtSpecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KtSpecError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, KtSpecError>;
