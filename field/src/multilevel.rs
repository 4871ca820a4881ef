//! Reference multi-level field with real/Fourier representations.

use std::borrow::Cow;
use std::sync::Arc;

use num_complex::Complex64;

use crate::algebra::Field;
use crate::context::{Layout, MultiLevelContext};
use crate::error::{FieldError, FieldResult};

/// Representation currently held by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Real,
    Fourier,
}

/// Whether a field is a linear functional or a field direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Covector,
    Vector,
}

/// A complex field stored level by level on a [`MultiLevelContext`].
///
/// Transforms are unitary, so the plain (covector·vector) inner product is
/// the same in either domain. The covector·covector product is weighted by
/// the level spectra and is always evaluated in Fourier space.
#[derive(Debug, Clone)]
pub struct MultiLevelField {
    context: Arc<MultiLevelContext>,
    levels: Vec<Vec<Complex64>>,
    domain: Domain,
    kind: FieldKind,
}

impl MultiLevelField {
    /// All-zero field in real space.
    pub fn zeros(context: Arc<MultiLevelContext>, kind: FieldKind) -> Self {
        let levels = context
            .layout()
            .level_sizes()
            .iter()
            .map(|&n| vec![Complex64::new(0.0, 0.0); n])
            .collect();
        Self {
            context,
            levels,
            domain: Domain::Real,
            kind,
        }
    }

    /// Field from real-space values, one vector per level.
    pub fn from_real_levels(
        context: Arc<MultiLevelContext>,
        kind: FieldKind,
        values: Vec<Vec<f64>>,
    ) -> FieldResult<Self> {
        let layout = context.layout();
        if values.len() != layout.num_levels() {
            return Err(FieldError::LevelCount {
                expected: layout.num_levels(),
                found: values.len(),
            });
        }
        for (level, (data, &expected)) in values.iter().zip(layout.level_sizes()).enumerate() {
            if data.len() != expected {
                return Err(FieldError::level_size(level, expected, data.len()));
            }
        }

        let levels = values
            .into_iter()
            .map(|data| data.into_iter().map(|v| Complex64::new(v, 0.0)).collect())
            .collect();
        Ok(Self {
            context,
            levels,
            domain: Domain::Real,
            kind,
        })
    }

    pub fn context(&self) -> &Arc<MultiLevelContext> {
        &self.context
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Raw data of one level in the current domain.
    pub fn level(&self, level: usize) -> Option<&[Complex64]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    pub fn to_real(&mut self) {
        self.transform(Domain::Real);
    }

    /// Real parts of the real-space values, without changing `self`.
    pub fn real_values(&self) -> Vec<Vec<f64>> {
        self.levels_in(Domain::Real)
            .iter()
            .map(|data| data.iter().map(|v| v.re).collect())
            .collect()
    }

    fn levels_in(&self, domain: Domain) -> Cow<'_, [Vec<Complex64>]> {
        if self.domain == domain {
            Cow::Borrowed(self.levels.as_slice())
        } else {
            let mut copy = self.clone();
            copy.transform(domain);
            Cow::Owned(copy.levels)
        }
    }

    fn transform(&mut self, domain: Domain) {
        if self.domain == domain {
            return;
        }

        for (index, data) in self.levels.iter_mut().enumerate() {
            let plan = match domain {
                Domain::Fourier => self.context.forward(index),
                Domain::Real => self.context.inverse(index),
            };
            plan.process(data.as_mut_slice());
            let norm = 1.0 / (data.len() as f64).sqrt();
            for value in data.iter_mut() {
                *value *= norm;
            }
        }
        self.domain = domain;
    }
}

impl Field for MultiLevelField {
    type Scalar = Complex64;
    type Layout = Layout;

    fn layout(&self) -> &Layout {
        self.context.layout()
    }

    fn inner_product(&self, other: &Self) -> Complex64 {
        debug_assert_eq!(self.layout(), other.layout());

        let mut total = Complex64::new(0.0, 0.0);
        if self.kind == FieldKind::Covector && other.kind == FieldKind::Covector {
            let a = self.levels_in(Domain::Fourier);
            let b = other.levels_in(Domain::Fourier);
            for ((a, b), level) in a.iter().zip(b.iter()).zip(self.context.levels()) {
                for ((x, y), weight) in a.iter().zip(b).zip(level.spectrum()) {
                    total += x.conj() * *y * *weight;
                }
            }
        } else {
            let b = other.levels_in(self.domain);
            for (a, b) in self.levels.iter().zip(b.iter()) {
                for (x, y) in a.iter().zip(b) {
                    total += x.conj() * *y;
                }
            }
        }
        total
    }

    fn add_scaled(&mut self, other: &Self, scale: Complex64) {
        debug_assert_eq!(self.layout(), other.layout());
        debug_assert_eq!(self.kind, other.kind);

        let b = other.levels_in(self.domain);
        for (a, b) in self.levels.iter_mut().zip(b.iter()) {
            for (x, y) in a.iter_mut().zip(b) {
                *x += scale * *y;
            }
        }
    }

    fn scale(&mut self, factor: Complex64) {
        for value in self.levels.iter_mut().flatten() {
            *value *= factor;
        }
    }

    fn to_fourier(&mut self) {
        self.transform(Domain::Fourier);
    }

    fn convert_to_vector(&mut self) {
        if self.kind == FieldKind::Vector {
            return;
        }

        self.to_fourier();
        for (data, level) in self.levels.iter_mut().zip(self.context.levels()) {
            for (value, weight) in data.iter_mut().zip(level.spectrum()) {
                *value *= *weight;
            }
        }
        self.kind = FieldKind::Vector;
    }

    fn num_cells(&self) -> usize {
        self.context.num_cells()
    }
}
