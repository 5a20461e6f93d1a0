//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! Only arity, index and length violations are errors. Out-of-domain call
//! codes are coerced to the missing (or error) state by the constructors and
//! never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for genopack operations
#[derive(Error, Debug)]
pub enum GenopackError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrong number of haplotypes passed to a derivation routine
    #[error("Expected {expected} haplotypes, found {found}")]
    IncorrectHaplotypeNumber { expected: usize, found: usize },

    /// Locus index outside the array
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Pairwise operation on arrays of different length
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Parse errors
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid data errors (ragged rows, duplicated individuals)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File not found errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Type alias for Results using GenopackError
pub type Result<T> = std::result::Result<T, GenopackError>;

impl GenopackError {
    /// Create an index error
    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Fail unless two arrays have the same length
    pub(crate) fn check_lengths(left: usize, right: usize) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(Self::length_mismatch(left, right))
        }
    }
}
