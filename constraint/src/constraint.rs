//! Constraint storage.

use std::ops::Index;

use conic_field::Field;

/// A linear constraint: the functional `covector` should evaluate to `target`.
///
/// `existing` is the functional evaluated on the output field when it was last
/// computed. It is stale as soon as the covector is rescaled or combined.
#[derive(Debug, Clone)]
pub struct Constraint<F: Field> {
    pub covector: F,
    pub target: F::Scalar,
    pub existing: F::Scalar,
}

impl<F: Field> Constraint<F> {
    pub fn new(covector: F, target: F::Scalar, existing: F::Scalar) -> Self {
        Self {
            covector,
            target,
            existing,
        }
    }

    /// Correction still needed: `target - existing`.
    pub fn delta(&self) -> F::Scalar {
        self.target - self.existing
    }
}

/// Ordered collection of constraints.
///
/// Order is priority: under Gram–Schmidt every constraint is orthogonalised
/// against all constraints added before it.
#[derive(Debug, Clone)]
pub struct ConstraintList<F: Field> {
    constraints: Vec<Constraint<F>>,
}

impl<F: Field> Default for ConstraintList<F> {
    fn default() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }
}

impl<F: Field> ConstraintList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint. No validation happens here.
    pub fn push(&mut self, constraint: Constraint<F>) {
        self.constraints.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint<F>> {
        self.constraints.iter()
    }

    pub fn as_slice(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Constraint<F>] {
        &mut self.constraints
    }
}

impl<F: Field> Index<usize> for ConstraintList<F> {
    type Output = Constraint<F>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.constraints[index]
    }
}

impl<F: Field> IntoIterator for ConstraintList<F> {
    type Item = Constraint<F>;
    type IntoIter = std::vec::IntoIter<Constraint<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.into_iter()
    }
}

impl<'a, F: Field> IntoIterator for &'a ConstraintList<F> {
    type Item = &'a Constraint<F>;
    type IntoIter = std::slice::Iter<'a, Constraint<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}
