//! Producers of constraints.
//!
//! Concrete physical modifications (overdensity, angular momentum, ...) live
//! outside this crate. They only need to hand over a fresh covector and the
//! value it should take.

use conic_field::Field;

/// A linear modification of the output field.
pub trait Modification<F: Field> {
    /// Covector representing the modified quantity.
    fn covector(&self) -> F;

    /// Value the quantity should take after modification.
    fn target(&self) -> F::Scalar;

    /// Value of the quantity on `field`.
    fn current_value(&self, field: &F) -> F::Scalar {
        self.covector().inner_product(field)
    }
}

/// A modification given directly as a covector and a target.
#[derive(Debug, Clone)]
pub struct LinearModification<F: Field> {
    covector: F,
    target: F::Scalar,
}

impl<F: Field> LinearModification<F> {
    pub fn new(covector: F, target: F::Scalar) -> Self {
        Self { covector, target }
    }
}

impl<F: Field> Modification<F> for LinearModification<F> {
    fn covector(&self) -> F {
        self.covector.clone()
    }

    fn target(&self) -> F::Scalar {
        self.target
    }
}
