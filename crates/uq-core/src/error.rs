//! Error types for uncertainty quantification
//!
//! Provides a unified error type for all uq-stats crates.

use thiserror::Error;

/// Core error type for persistence and optimization operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to a function (unsupported version,
    /// unsupported problem shape, reserved name...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two containers that must agree on their dimension do not
    #[error("Invalid dimension in {context}: expected {expected}, got {actual}")]
    InvalidDimension {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Broken internal invariant
    #[error("Internal error: {0}")]
    Internal(String),

    /// Capability not provided by the current implementation
    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),

    /// A function evaluation failed
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Medium content could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error (for file-backed media)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a dimension mismatch
    pub fn dimension_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidDimension {
            expected,
            actual,
            context: context.to_string(),
        }
    }

    /// Create an error for a study version the manager cannot handle
    pub fn unsupported_version(version: u32) -> Self {
        Self::InvalidArgument(format!("Study version {version} is NOT supported"))
    }

    /// Create an error for a capability missing on a given implementation
    pub fn not_yet_implemented(owner: &str, operation: &str) -> Self {
        Self::NotYetImplemented(format!("In {owner}::{operation}"))
    }

    /// Whether this error belongs to the invalid-argument class
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
