//! Conic Field
//!
//! Field algebra for constrained realizations on nested grids.
//!
//! Responsibilities:
//! - Define the numeric contract ([`Scalar`]) and field contract ([`Field`])
//!   that the constraint engine is generic over
//! - Describe a grid hierarchy with per-level covariance spectra
//! - Provide a reference multi-level field with unitary real/Fourier
//!   conversion and covector/vector semantics

mod algebra;
mod context;
mod error;
mod multilevel;
mod scalar;

pub use algebra::Field;
pub use context::{GridLevel, Layout, MultiLevelContext, MultiLevelContextBuilder};
pub use error::{FieldError, FieldResult};
pub use multilevel::{Domain, FieldKind, MultiLevelField};
pub use scalar::Scalar;

pub use num_complex::Complex64;
