//! The field algebra consumed by the constraint engine.

use std::fmt;

use crate::scalar::Scalar;

/// A field living on a multi-level grid hierarchy.
///
/// A value of this type is either a *covector* (a linear functional, whose
/// inner product with a field evaluates the functional) or a *vector* (a field
/// direction that can be added to a realization). Implementations decide how
/// the two are distinguished; the engine only relies on the identity
///
/// ```text
/// ⟨a, convert_to_vector(b)⟩ == ⟨a, b⟩      for covectors a, b
/// ```
///
/// so that adding `convert_to_vector(α)` to a field moves `⟨α, field⟩` by
/// exactly `⟨α, α⟩`.
pub trait Field: Clone {
    /// Amplitude type.
    type Scalar: Scalar;

    /// Level structure; fields are only combinable when layouts are equal.
    type Layout: PartialEq + fmt::Debug;

    fn layout(&self) -> &Self::Layout;

    /// Hermitian inner product, conjugate-linear in `self`, summed across
    /// every level of the hierarchy.
    fn inner_product(&self, other: &Self) -> Self::Scalar;

    /// `self += scale * other`
    fn add_scaled(&mut self, other: &Self, scale: Self::Scalar);

    /// `self *= factor`
    fn scale(&mut self, factor: Self::Scalar);

    /// `self /= divisor`
    fn divide(&mut self, divisor: Self::Scalar) {
        self.scale(Self::Scalar::one() / divisor);
    }

    /// Move to the Fourier representation. Idempotent.
    fn to_fourier(&mut self);

    /// Turn a covector into the field direction it induces. Idempotent on
    /// vectors.
    fn convert_to_vector(&mut self);

    /// Total number of cells across levels.
    fn num_cells(&self) -> usize;
}
