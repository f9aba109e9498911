//! Centralized error handling for RuProj
//!
//! This module provides structured error types for the projection engine,
//! enabling better error context and type safety than a generic `Box<dyn Error>`.

use crate::dtype::DType;
use std::fmt;

/// Main error type for RuProj operations
#[derive(Debug)]
pub enum RuProjError {
    /// Invalid argument (selector length, mask kind, percentile range, ...)
    InvalidArgument(String),

    /// Mask shape incompatible with the input shape, even after singleton
    /// broadcast expansion
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Requested statistic has no instantiation for the input's element type
    UnsupportedType { dtype: DType, operation: String },

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Generic error for backward compatibility
    Generic(String),
}

impl fmt::Display for RuProjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuProjError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            RuProjError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "Shape mismatch: expected {:?}, found {:?}",
                    expected, found
                )
            }
            RuProjError::UnsupportedType { dtype, operation } => {
                write!(
                    f,
                    "Data type {} is not supported by operation '{}'",
                    dtype, operation
                )
            }
            RuProjError::ArrayError(e) => write!(f, "Array error: {}", e),
            RuProjError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RuProjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuProjError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ndarray::ShapeError> for RuProjError {
    fn from(error: ndarray::ShapeError) -> Self {
        RuProjError::ArrayError(error)
    }
}

impl From<String> for RuProjError {
    fn from(error: String) -> Self {
        RuProjError::Generic(error)
    }
}

impl From<&str> for RuProjError {
    fn from(error: &str) -> Self {
        RuProjError::Generic(error.to_string())
    }
}

/// Result type alias for RuProj operations
pub type Result<T> = std::result::Result<T, RuProjError>;
