//! Error handling module for Clipdeck

use thiserror::Error;

/// Main error type for Clipdeck operations
#[derive(Error, Debug)]
pub enum ClipdeckError {
    /// Engine load has not completed yet
    #[error("Engine is not loaded; load the engine before issuing commands")]
    EngineNotReady,

    /// Command text tokenized to nothing
    #[error("Command is empty; nothing to run")]
    EmptyCommand,

    /// Engine reported a failed execution
    #[error("Engine execution failed: {message}")]
    ExecutionFailure { message: String },

    /// Execution finished but the expected output file was never written
    #[error("Engine produced no output file named {name}")]
    MissingOutput { name: String },

    /// Proxy generation failed for a single tracked file
    #[error("Proxy generation failed for {file}: {message}")]
    ProxyGenerationFailure { file: String, message: String },

    /// Referenced file id is not tracked by the session
    #[error("Unknown file id: {id}")]
    UnknownFile { id: String },

    /// Invalid operation parameter
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Invalid engine-visible file name
    #[error("Invalid engine file name: {name}")]
    InvalidFileName { name: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS")]
    InvalidTimeFormat { time: String },

    /// Configuration load/store error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for Clipdeck operations
pub type ClipdeckResult<T> = std::result::Result<T, ClipdeckError>;
