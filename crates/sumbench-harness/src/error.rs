//! Harness error types.

use thiserror::Error;

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while compiling, measuring, persisting or plotting.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A compiler exited non-zero.
    #[error("Compilation of '{label}' failed ({status}): {stderr}")]
    Compilation {
        label: String,
        status: String,
        stderr: String,
    },

    /// A process could not be started at all.
    #[error("Failed to launch {program}: {message}")]
    Spawn { program: String, message: String },

    /// A benchmark executable exited non-zero.
    #[error("{program} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    /// Executable output was not `<field>,<seconds>`.
    #[error("Malformed output from {program}: expected '<value>,<seconds>', got {output:?}")]
    MalformedOutput { program: String, output: String },

    /// The elapsed-time field was not a number.
    #[error("Invalid elapsed time from {program}: {field:?}")]
    InvalidTime { program: String, field: String },

    /// Aggregation was asked to summarize nothing.
    #[error("No samples to aggregate")]
    EmptySamples,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization error.
    #[error("Export error: {0}")]
    Export(String),

    /// Chart rendering error.
    #[error("Plot error: {0}")]
    Plot(String),
}

impl From<std::io::Error> for HarnessError {
    fn from(e: std::io::Error) -> Self {
        HarnessError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        HarnessError::Export(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for HarnessError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        HarnessError::Config(e.to_string())
    }
}
