use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::settings::ConfigError;

/// Errors that can occur while driving a scratch repository
#[derive(Debug, Error)]
pub enum GitError {
    /// The tool exited non-zero or could not be started.
    ///
    /// `output` is the tool's combined stdout/stderr, verbatim. When the process never
    /// started it holds the spawn error instead and `exit_code` is `None`.
    #[error("{output}")]
    CommandFailed {
        output: String,
        exit_code: Option<i32>,
    },

    #[error("Repository at {} has been unlinked", .0.display())]
    Unlinked(PathBuf),

    #[error("Failed to parse git output: {0}")]
    ParseError(String),

    #[error("Git version {0} is too old. Minimum required: 2.20")]
    GitVersionTooOld(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl GitError {
    /// Raw tool output carried by a command failure
    pub fn output(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, GitError>;
