//! Error types for edadoc.
//!
//! Library crates use [`EdaDocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all edadoc operations.
#[derive(Debug, thiserror::Error)]
pub enum EdaDocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A documentation file is not well-formed XML. Fatal for the whole run.
    #[error("XML error in {path:?}: {message}")]
    Xml { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input or output validation error (bad directory, bad pattern, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Document or JSON rendering error.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EdaDocError>;

impl EdaDocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an XML parse error for the given file.
    pub fn xml(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
