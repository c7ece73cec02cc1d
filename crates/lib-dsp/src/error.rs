//! Error types for DSP operations.
//!
//! Only recoverable conditions are represented here. Contract violations
//! (an empty transform, a spectrum of the wrong length handed to the
//! panicking entry points) fail fast, and degraded-precision conditions
//! produce defined sentinel values instead of errors.

use thiserror::Error;

/// Errors that can occur during DSP operations.
#[derive(Debug, Error)]
pub enum DspError {
    /// Transform length is not usable.
    #[error("Transform size must be non-zero, got {0}")]
    InvalidFftSize(usize),

    /// Input length mismatch.
    #[error("Input length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Insufficient data for operation.
    #[error("Insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid configuration or argument.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Numerical instability detected.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted file could not be parsed or written.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DspError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
