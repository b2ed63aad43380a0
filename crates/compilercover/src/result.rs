//! Result and error types for compilercover.
//!
//! Every variant is fatal to the run that produced it; nothing retries.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for compilercover operations
pub type CoverResult<T> = Result<T, CoverError>;

/// Errors that can occur while instrumenting a tree or writing a report
#[derive(Debug, Error)]
pub enum CoverError {
    /// A directory or file under the subtree could not be read
    #[error("Traversal of {} failed: {source}", path.display())]
    Traversal {
        /// Path being visited when the walk failed
        path: PathBuf,
        /// Underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// The instrumentor could not be started at all
    #[error("Failed to launch instrumentor '{program}': {source}")]
    ToolLaunch {
        /// Program that failed to spawn
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The instrumentor ran but reported failure
    #[error("Instrumentor failed on {path} ({status}):\n{stdout}{stderr}")]
    Instrumentation {
        /// Tree-relative path of the file being instrumented
        path: String,
        /// Exit status of the tool
        status: ExitStatus,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The generated driver could not be written
    #[error("Failed to write driver {}: {source}", path.display())]
    DriverWrite {
        /// Driver destination
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Counter, position and statement tables disagree in length
    #[error(
        "coverage: mismatched sizes (counters={counters}, positions={positions}, num_stmts={num_stmts})"
    )]
    SizeMismatch {
        /// Number of counters
        counters: usize,
        /// Number of position words
        positions: usize,
        /// Number of statement counts
        num_stmts: usize,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoverError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
