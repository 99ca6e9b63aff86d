//! Error types for codetrace

use thiserror::Error;

/// Errors that can occur outside the per-session core
///
/// Nothing in feature extraction itself is fatal: malformed events and empty
/// sessions are dropped, divisions by zero yield 0. These variants cover the
/// surrounding plumbing (loading files, parsing documents, configuration,
/// scaler state).
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse session payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Scaler error: {0}")]
    Scaler(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
