//! Configuration for constraint application.

use serde::{Deserialize, Serialize};

use crate::error::{ConstraintError, ConstraintResult};

/// What to do when a transformed target keeps an imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResiduePolicy {
    /// Carry the complex value through untouched.
    Ignore,
    /// Log a warning and carry on.
    #[default]
    Warn,
    /// Abort before the output field is touched.
    Reject,
}

/// Tolerances and diagnostic switches for a [`ConstraintApplicator`].
///
/// [`ConstraintApplicator`]: crate::ConstraintApplicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicatorConfig {
    /// A covector whose squared norm after projection falls to this fraction
    /// of its original squared norm is treated as linearly dependent.
    pub degeneracy_tolerance: f64,
    pub residue_policy: ResiduePolicy,
    /// Imaginary part allowed on a target, relative to `max(1, |re|)`.
    pub residue_tolerance: f64,
    /// Report `Tᴴ·T / n_cells` after orthonormalisation.
    pub report_chi2: bool,
    /// Report starting and target values before orthonormalisation.
    pub report_values: bool,
    /// Recompute the Gram matrix after orthonormalisation and fail if it is
    /// not the identity. Costs another n² inner products.
    pub verify_orthonormality: bool,
    pub orthonormality_tolerance: f64,
}

impl Default for ApplicatorConfig {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-10,
            residue_policy: ResiduePolicy::Warn,
            residue_tolerance: 1e-6,
            report_chi2: true,
            report_values: true,
            verify_orthonormality: false,
            orthonormality_tolerance: 1e-8,
        }
    }
}

impl ApplicatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No reporting, strict checks. Useful for batch runs and tests.
    pub fn strict() -> Self {
        Self {
            residue_policy: ResiduePolicy::Reject,
            report_chi2: false,
            report_values: false,
            verify_orthonormality: true,
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(source: &str) -> ConstraintResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_degeneracy_tolerance(mut self, tolerance: f64) -> Self {
        self.degeneracy_tolerance = tolerance;
        self
    }

    pub fn with_residue_policy(mut self, policy: ResiduePolicy) -> Self {
        self.residue_policy = policy;
        self
    }

    pub fn with_residue_tolerance(mut self, tolerance: f64) -> Self {
        self.residue_tolerance = tolerance;
        self
    }

    pub fn with_chi2_report(mut self, enabled: bool) -> Self {
        self.report_chi2 = enabled;
        self
    }

    pub fn with_values_report(mut self, enabled: bool) -> Self {
        self.report_values = enabled;
        self
    }

    pub fn with_orthonormality_check(mut self, tolerance: f64) -> Self {
        self.verify_orthonormality = true;
        self.orthonormality_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> ConstraintResult<()> {
        check_tolerance("degeneracy_tolerance", self.degeneracy_tolerance)?;
        check_tolerance("residue_tolerance", self.residue_tolerance)?;
        check_tolerance("orthonormality_tolerance", self.orthonormality_tolerance)?;
        Ok(())
    }
}

fn check_tolerance(name: &str, value: f64) -> ConstraintResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConstraintError::invalid_config(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}
