//! Field error types.

use thiserror::Error;

/// Result type for field construction.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised while building hierarchies or fields.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("hierarchy has no levels")]
    EmptyHierarchy,

    #[error("level {level} has no cells")]
    EmptyLevel { level: usize },

    #[error("level {level}: spectrum entry {mode} is negative or not finite ({value})")]
    InvalidSpectrum { level: usize, mode: usize, value: f64 },

    #[error("field has {found} levels, hierarchy has {expected}")]
    LevelCount { expected: usize, found: usize },

    #[error("level {level}: field has {found} cells, expected {expected}")]
    LevelSize {
        level: usize,
        expected: usize,
        found: usize,
    },
}

impl FieldError {
    pub fn level_size(level: usize, expected: usize, found: usize) -> Self {
        Self::LevelSize {
            level,
            expected,
            found,
        }
    }
}
