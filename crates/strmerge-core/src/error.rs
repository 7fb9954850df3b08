//! Error types for strmerge-core

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in strmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Source file is missing or cannot be read
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content does not follow the comment-block + translation-line grammar
    #[error("invalid strings file '{path}' at line {line}: {message}")]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Bytes are not UTF-16 text
    #[error("invalid encoding in '{path}': {message}")]
    Encoding { path: PathBuf, message: String },

    /// Destination cannot be created or written
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be started
    #[error("failed to run '{tool}': {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully
    #[error("'{tool}' exited with {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
