//! Collect, orthonormalise and apply linear constraints.

use conic_field::{Field, Scalar};
use ndarray::Array2;
use tracing::{debug, info};

use crate::config::ApplicatorConfig;
use crate::constraint::{Constraint, ConstraintList};
use crate::error::{ConstraintError, ConstraintResult};
use crate::modification::Modification;
use crate::observer::{ConstraintObserver, NullObserver, Stage};
use crate::orthonormal::{self, Orthonormalisation};

/// Lifecycle of a [`ConstraintApplicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicatorState {
    /// Accepting constraints.
    Accumulating,
    /// Covectors have been orthonormalised but nothing has been applied.
    Orthonormalised,
    /// Constraints were applied, or orthonormalisation failed part-way.
    /// Only [`ConstraintApplicator::reset`] leaves this state.
    Consumed,
}

/// Outcome of [`ConstraintApplicator::apply`].
#[derive(Debug, Clone)]
pub struct Application<S: Scalar> {
    pub orthonormalisation: Orthonormalisation<S>,
    /// `target - existing` added along each orthonormalised direction.
    pub deltas: Vec<S>,
}

/// Owns a list of constraints and imposes them on an output field.
///
/// The output field is borrowed for a single call only. Constraint order is
/// priority: earlier constraints are left untouched by later ones, later
/// constraints absorb whatever is needed to stay consistent.
pub struct ConstraintApplicator<F: Field, O: ConstraintObserver = NullObserver> {
    constraints: ConstraintList<F>,
    config: ApplicatorConfig,
    observer: O,
    state: ApplicatorState,
}

impl<F: Field> ConstraintApplicator<F, NullObserver> {
    pub fn new(config: ApplicatorConfig) -> Self {
        Self::with_observer(config, NullObserver)
    }
}

impl<F: Field> Default for ConstraintApplicator<F, NullObserver> {
    fn default() -> Self {
        Self::new(ApplicatorConfig::default())
    }
}

impl<F: Field, O: ConstraintObserver> ConstraintApplicator<F, O> {
    pub fn with_observer(config: ApplicatorConfig, observer: O) -> Self {
        Self {
            constraints: ConstraintList::new(),
            config,
            observer,
            state: ApplicatorState::Accumulating,
        }
    }

    pub fn state(&self) -> ApplicatorState {
        self.state
    }

    pub fn config(&self) -> &ApplicatorConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintList<F> {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    // ========== Collection ==========

    /// Queue a constraint. The covector is taken by value; it is validated
    /// only when the list is orthonormalised.
    pub fn add_constraint(
        &mut self,
        covector: F,
        target: F::Scalar,
        existing: F::Scalar,
    ) -> ConstraintResult<()> {
        self.ensure_open()?;
        self.constraints.push(Constraint::new(covector, target, existing));
        self.state = ApplicatorState::Accumulating;
        Ok(())
    }

    /// Queue the constraint described by `modification`, measuring its
    /// current value on `output`.
    pub fn add_modification<M>(&mut self, modification: &M, output: &F) -> ConstraintResult<()>
    where
        M: Modification<F> + ?Sized,
    {
        self.ensure_open()?;
        let covector = modification.covector();
        if covector.layout() != output.layout() {
            return Err(ConstraintError::dimension_mismatch(
                self.constraints.len(),
                format!("{:?}", output.layout()),
                format!("{:?}", covector.layout()),
            ));
        }
        let existing = modification.current_value(output);
        self.add_constraint(covector, modification.target(), existing)
    }

    // ========== Diagnostics ==========

    /// Covariance `⟨αᵢ, αⱼ⟩` of the queued covectors, also reported to the
    /// observer as `cov_matr`.
    pub fn covariance(&mut self) -> ConstraintResult<Array2<F::Scalar>> {
        self.ensure_open()?;
        if let Some(first) = self.constraints.as_slice().first() {
            orthonormal::check_layouts(self.constraints.as_slice(), &first.covector)?;
        }

        let matrix = orthonormal::covariance(self.constraints.as_slice(), &mut self.observer);
        let real = matrix.mapv(Scalar::re);
        self.observer.matrix("cov_matr", &real);
        Ok(matrix)
    }

    // ========== Orthonormalisation and application ==========

    /// Orthonormalise the queued covectors in place and recompute existing
    /// values against `output`. May be called on its own for diagnostics.
    pub fn orthonormalise(
        &mut self,
        output: &F,
    ) -> ConstraintResult<Orthonormalisation<F::Scalar>> {
        self.ensure_open()?;

        let result = orthonormal::orthonormalise(
            self.constraints.as_mut_slice(),
            output,
            &self.config,
            &mut self.observer,
        );
        match result {
            Ok(report) => {
                self.state = ApplicatorState::Orthonormalised;
                Ok(report)
            }
            // Detected before any covector was touched.
            Err(e @ ConstraintError::DimensionMismatch { .. }) => Err(e),
            Err(e) => {
                self.state = ApplicatorState::Consumed;
                Err(e)
            }
        }
    }

    /// Impose every queued constraint on `output`.
    ///
    /// On error `output` is left untouched. On success the list is consumed
    /// and the applicator must be [`reset`](Self::reset) before reuse.
    pub fn apply(&mut self, output: &mut F) -> ConstraintResult<Application<F::Scalar>> {
        let orthonormalisation = self.orthonormalise(output)?;

        output.to_fourier();

        let n = self.constraints.len();
        let mut deltas = Vec::with_capacity(n);
        for (index, constraint) in self.constraints.as_slice().iter().enumerate() {
            self.observer.progress(Stage::Apply, index, n);

            let delta = constraint.delta();
            let mut direction = constraint.covector.clone();
            direction.convert_to_vector();
            direction.to_fourier();
            output.add_scaled(&direction, delta);

            debug!(index, delta = ?delta, "applied constraint");
            deltas.push(delta);
        }
        self.observer.progress(Stage::Apply, n, n);

        self.state = ApplicatorState::Consumed;
        info!(constraints = n, "constraints applied");

        Ok(Application {
            orthonormalisation,
            deltas,
        })
    }

    /// Drop the queued constraints and start accumulating again.
    pub fn reset(&mut self) -> ConstraintList<F> {
        self.state = ApplicatorState::Accumulating;
        std::mem::take(&mut self.constraints)
    }

    fn ensure_open(&self) -> ConstraintResult<()> {
        if self.state == ApplicatorState::Consumed {
            return Err(ConstraintError::AlreadyConsumed);
        }
        Ok(())
    }
}
