//! Error types for field construction and dataset decoding.
//!
//! Steady-state ticks never produce errors: missing wind and off-view pixels
//! are `None` values that retire particles. Errors only surface when a caller
//! hands the engine malformed input.

use std::fmt;

/// Errors raised while building a [`VectorField`](crate::spatial::field::VectorField).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Component arrays disagree with each other or with `nx * ny`.
    LengthMismatch {
        expected: usize,
        u_len: usize,
        v_len: usize,
    },
    /// A cell dimension is zero, NaN or infinite.
    InvalidCellSize { cell_width: f64, cell_height: f64 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::LengthMismatch { expected, u_len, v_len } => write!(
                f,
                "component length mismatch: header expects {} samples, got u={} v={}",
                expected, u_len, v_len
            ),
            FieldError::InvalidCellSize { cell_width, cell_height } => write!(
                f,
                "invalid cell size: dx={} dy={} (both must be finite and non-zero)",
                cell_width, cell_height
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Errors raised while decoding a wind dataset from JSON.
#[derive(Debug)]
pub enum DatasetError {
    /// The payload is not valid JSON for any supported shape.
    Parse(serde_json::Error),
    /// The two-record form is missing its u or v record.
    MissingComponent(&'static str),
    /// The u and v records describe different grids.
    HeaderMismatch,
    /// The decoded arrays do not form a valid field.
    Field(FieldError),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Parse(e) => write!(f, "failed to parse wind dataset: {}", e),
            DatasetError::MissingComponent(which) => {
                write!(f, "wind dataset is missing the {} component", which)
            }
            DatasetError::HeaderMismatch => {
                write!(f, "u and v components describe different grids")
            }
            DatasetError::Field(e) => write!(f, "invalid wind field: {}", e),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Parse(e) => Some(e),
            DatasetError::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        DatasetError::Parse(e)
    }
}

impl From<FieldError> for DatasetError {
    fn from(e: FieldError) -> Self {
        DatasetError::Field(e)
    }
}
