//! Conic Constraint
//!
//! Impose linear constraints on a multi-level random field realization.
//!
//! Responsibilities:
//! - Collect (covector, target, existing value) triples in priority order
//! - Orthonormalise the covectors by Gram–Schmidt, transforming targets alongside
//! - Add the minimal correction to the output field so every target is met
//! - Reject degenerate or mismatched constraints before the field is touched
//! - Report covariance and chi² diagnostics through an observer

mod applicator;
mod config;
mod constraint;
mod error;
mod modification;
mod observer;
mod orthonormal;

#[cfg(test)]
mod testing;

pub use applicator::{Application, ApplicatorState, ConstraintApplicator};
pub use config::{ApplicatorConfig, ResiduePolicy};
pub use constraint::{Constraint, ConstraintList};
pub use error::{ConstraintError, ConstraintResult};
pub use modification::{LinearModification, Modification};
pub use observer::{
    format_matrix, ConstraintObserver, NullObserver, Stage, TracingObserver, WriterObserver,
};
pub use orthonormal::Orthonormalisation;
