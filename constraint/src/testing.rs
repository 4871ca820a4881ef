//! Single-level real field with a diagonal covariance, for unit tests.

use conic_field::Field;

const WEIGHTS: [f64; 4] = [1.0, 2.0, 1.0, 0.5];

#[derive(Debug, Clone)]
pub(crate) struct DenseField {
    values: Vec<f64>,
    weights: Vec<f64>,
    layout: Vec<usize>,
    covector: bool,
    fourier: bool,
}

/// Vector field over `values.len()` cells; covariance weights cycle through
/// `[1, 2, 1, 0.5]`.
pub(crate) fn dense(values: &[f64]) -> DenseField {
    DenseField {
        values: values.to_vec(),
        weights: WEIGHTS.iter().copied().cycle().take(values.len()).collect(),
        layout: vec![values.len()],
        covector: false,
        fourier: false,
    }
}

impl DenseField {
    pub(crate) fn covector(mut self) -> Self {
        self.covector = true;
        self
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn is_fourier(&self) -> bool {
        self.fourier
    }
}

impl Field for DenseField {
    type Scalar = f64;
    type Layout = Vec<usize>;

    fn layout(&self) -> &Vec<usize> {
        &self.layout
    }

    fn inner_product(&self, other: &Self) -> f64 {
        let weighted = self.covector && other.covector;
        self.values
            .iter()
            .zip(&other.values)
            .zip(&self.weights)
            .map(|((a, b), w)| if weighted { a * b * w } else { a * b })
            .sum()
    }

    fn add_scaled(&mut self, other: &Self, scale: f64) {
        for (a, b) in self.values.iter_mut().zip(&other.values) {
            *a += scale * b;
        }
    }

    fn scale(&mut self, factor: f64) {
        for a in &mut self.values {
            *a *= factor;
        }
    }

    fn to_fourier(&mut self) {
        self.fourier = true;
    }

    fn convert_to_vector(&mut self) {
        if !self.covector {
            return;
        }
        for (a, w) in self.values.iter_mut().zip(&self.weights) {
            *a *= w;
        }
        self.covector = false;
    }

    fn num_cells(&self) -> usize {
        self.values.len()
    }
}
