//! Constraint error types.

use thiserror::Error;

/// Result type for constraint operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors that can occur while orthonormalising or applying constraints.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// The covector is null or linearly dependent on earlier constraints.
    #[error("constraint {index} is degenerate: residual squared norm {norm_sq:e} after orthogonalisation")]
    Degenerate { index: usize, norm_sq: f64 },

    /// The covector lives on a different grid hierarchy than the output field.
    #[error("constraint {index} does not match the output field: expected layout {expected}, found {found}")]
    DimensionMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("constraint list has already been consumed; reset before reuse")]
    AlreadyConsumed,

    #[error("constraint {index} target has imaginary residue {residue:e}")]
    ImaginaryResidue { index: usize, residue: f64 },

    #[error("orthonormality lost between constraints {row} and {col}: deviation {deviation:e}")]
    LostOrthonormality {
        row: usize,
        col: usize,
        deviation: f64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl ConstraintError {
    pub fn degenerate(index: usize, norm_sq: f64) -> Self {
        Self::Degenerate { index, norm_sq }
    }

    pub fn dimension_mismatch(
        index: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            index,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
