//! In-place Gram–Schmidt orthonormalisation of a constraint list.

use conic_field::{Field, Scalar};
use ndarray::Array2;
use tracing::{debug, warn};

use crate::config::{ApplicatorConfig, ResiduePolicy};
use crate::constraint::Constraint;
use crate::error::{ConstraintError, ConstraintResult};
use crate::observer::{ConstraintObserver, Stage};

/// Outcome of orthonormalising a constraint list.
#[derive(Debug, Clone)]
pub struct Orthonormalisation<S: Scalar> {
    /// Row `i` holds the coefficients of the original covectors that make up
    /// orthonormalised covector `i` (lower triangular).
    pub transform: Array2<S>,
    /// `Tᴴ·T / n_cells`, when requested.
    pub chi2: Option<Array2<f64>>,
    /// Targets expressed against the orthonormalised covectors.
    pub targets: Vec<S>,
    /// Values of the orthonormalised covectors on the output field.
    pub existing: Vec<S>,
}

/// Fail if any covector's layout differs from the output field's.
pub(crate) fn check_layouts<F: Field>(
    constraints: &[Constraint<F>],
    output: &F,
) -> ConstraintResult<()> {
    let expected = output.layout();
    for (index, constraint) in constraints.iter().enumerate() {
        let found = constraint.covector.layout();
        if found != expected {
            return Err(ConstraintError::dimension_mismatch(
                index,
                format!("{:?}", expected),
                format!("{:?}", found),
            ));
        }
    }
    Ok(())
}

/// Hermitian matrix `⟨αᵢ, αⱼ⟩` of the covectors as they currently stand.
pub(crate) fn covariance<F: Field, O: ConstraintObserver>(
    constraints: &[Constraint<F>],
    observer: &mut O,
) -> Array2<F::Scalar> {
    let n = constraints.len();
    let total = n * (n + 1) / 2;
    let mut done = 0;
    let mut matrix = Array2::from_elem((n, n), F::Scalar::zero());

    for i in 0..n {
        for j in 0..=i {
            observer.progress(Stage::Covariance, done, total);
            let value = constraints[i]
                .covector
                .inner_product(&constraints[j].covector);
            matrix[[i, j]] = value;
            matrix[[j, i]] = value.conj();
            done += 1;
        }
    }
    observer.progress(Stage::Covariance, done, total);

    matrix
}

/// Orthonormalise `constraints` in insertion order, transform the targets in
/// lock-step and recompute existing values against `output`.
///
/// Covectors are overwritten as the pass proceeds; on error the list is left
/// partly transformed. `output` is never modified.
pub(crate) fn orthonormalise<F: Field, O: ConstraintObserver>(
    constraints: &mut [Constraint<F>],
    output: &F,
    config: &ApplicatorConfig,
    observer: &mut O,
) -> ConstraintResult<Orthonormalisation<F::Scalar>> {
    check_layouts(constraints, output)?;

    let n = constraints.len();
    let n_cells = output.num_cells();
    if n > n_cells {
        warn!(
            constraints = n,
            cells = n_cells,
            "more constraints than degrees of freedom"
        );
    }

    if config.report_values {
        let existing = real_parts(constraints.iter().map(|c| c.existing));
        let targets = real_parts(constraints.iter().map(|c| c.target));
        observer.values(&existing, &targets);
    }

    let mut transform = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            F::Scalar::one()
        } else {
            F::Scalar::zero()
        }
    });

    let total = n * (n + 1) / 2;
    let mut done = 0;
    observer.progress(Stage::Orthogonalise, done, total);

    for i in 0..n {
        let (earlier, rest) = constraints.split_at_mut(i);
        let current = &mut rest[0];

        let original_sq = current.covector.inner_product(&current.covector).re();
        if !original_sq.is_finite() || original_sq <= 0.0 {
            return Err(ConstraintError::degenerate(i, original_sq));
        }

        for (j, prior) in earlier.iter().enumerate() {
            observer.progress(Stage::Orthogonalise, done, total);

            let overlap = prior.covector.inner_product(&current.covector);
            current.covector.add_scaled(&prior.covector, -overlap);
            current.target -= overlap.conj() * prior.target;

            // Keep row i equal to the combination of originals making up αᵢ.
            for k in 0..=j {
                let t = transform[[j, k]];
                transform[[i, k]] -= overlap * t;
            }
            done += 1;
        }

        let norm_sq = current.covector.inner_product(&current.covector).re();
        if !norm_sq.is_finite() || norm_sq <= config.degeneracy_tolerance * original_sq {
            return Err(ConstraintError::degenerate(i, norm_sq));
        }

        let norm = F::Scalar::from_real(norm_sq.sqrt());
        current.covector.divide(norm);
        current.target /= norm;
        for k in 0..=i {
            transform[[i, k]] /= norm;
        }
        done += 1;

        debug!(index = i, norm = norm_sq.sqrt(), "orthonormalised constraint");
    }
    observer.progress(Stage::Orthogonalise, done, total);

    // Values measured against the old covectors are meaningless now.
    for constraint in constraints.iter_mut() {
        constraint.existing = constraint.covector.inner_product(output);
    }

    check_residue(constraints, config)?;
    if config.verify_orthonormality {
        verify_orthonormality(constraints, config.orthonormality_tolerance)?;
    }

    let chi2 = if config.report_chi2 {
        let matrix = chi2_matrix(&transform, n_cells);
        observer.matrix("chi2_matr", &matrix);
        Some(matrix)
    } else {
        None
    };

    Ok(Orthonormalisation {
        transform,
        chi2,
        targets: constraints.iter().map(|c| c.target).collect(),
        existing: constraints.iter().map(|c| c.existing).collect(),
    })
}

/// `Tᴴ·T / n_cells`, real parts. With d the vector of original values,
/// Δχ² = d₁ᴴ M d₁ − d₀ᴴ M d₀.
pub(crate) fn chi2_matrix<S: Scalar>(transform: &Array2<S>, n_cells: usize) -> Array2<f64> {
    let n = transform.nrows();
    let cells = n_cells.max(1) as f64;
    Array2::from_shape_fn((n, n), |(i, j)| {
        let mut sum = S::zero();
        for k in 0..n {
            sum += transform[[k, i]].conj() * transform[[k, j]];
        }
        sum.re() / cells
    })
}

pub(crate) fn real_parts<S: Scalar>(values: impl Iterator<Item = S>) -> Vec<f64> {
    values.map(Scalar::re).collect()
}

fn check_residue<F: Field>(
    constraints: &[Constraint<F>],
    config: &ApplicatorConfig,
) -> ConstraintResult<()> {
    if config.residue_policy == ResiduePolicy::Ignore {
        return Ok(());
    }

    for (index, constraint) in constraints.iter().enumerate() {
        let residue = constraint.target.im();
        if residue.abs() <= config.residue_tolerance * constraint.target.re().abs().max(1.0) {
            continue;
        }
        match config.residue_policy {
            ResiduePolicy::Reject => {
                return Err(ConstraintError::ImaginaryResidue { index, residue });
            }
            _ => warn!(index, residue, "constraint target has an imaginary residue"),
        }
    }
    Ok(())
}

fn verify_orthonormality<F: Field>(
    constraints: &[Constraint<F>],
    tolerance: f64,
) -> ConstraintResult<()> {
    for (row, a) in constraints.iter().enumerate() {
        for (col, b) in constraints.iter().enumerate().take(row + 1) {
            let expected = if row == col {
                F::Scalar::one()
            } else {
                F::Scalar::zero()
            };
            let deviation = (a.covector.inner_product(&b.covector) - expected).modulus();
            if !(deviation <= tolerance) {
                return Err(ConstraintError::LostOrthonormality {
                    row,
                    col,
                    deviation,
                });
            }
        }
    }
    Ok(())
}
