//! Expectations checked against a scenario outcome.

use conic_field::{Complex64, Field};

use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::Outcome;

/// What a scenario run should produce.
#[derive(Debug, Clone, Default)]
pub struct Expectation {
    /// Every original functional reaches its target within this tolerance.
    pub satisfied: Option<f64>,
    /// The stored covectors are orthonormal within this tolerance.
    pub orthonormal: Option<f64>,
    /// The run fails with an error whose message contains this text.
    pub error: Option<String>,
    /// The output field is bit-for-bit the initial realization.
    pub unchanged: bool,
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn satisfied(mut self, tolerance: f64) -> Self {
        self.satisfied = Some(tolerance);
        self
    }

    pub fn orthonormal(mut self, tolerance: f64) -> Self {
        self.orthonormal = Some(tolerance);
        self
    }

    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.error = Some(text.into());
        self
    }

    pub fn unchanged(mut self) -> Self {
        self.unchanged = true;
        self
    }

    pub fn verify(&self, scenario: &str, outcome: &Outcome) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::assertion_failed(scenario, message));

        match (&self.error, &outcome.result) {
            (Some(expected), Err(e)) if e.to_string().contains(expected.as_str()) => {}
            (Some(expected), Err(e)) => {
                return fail(format!("expected error containing '{}', got: {}", expected, e))
            }
            (Some(expected), Ok(_)) => {
                return fail(format!(
                    "expected error containing '{}', but application succeeded",
                    expected
                ))
            }
            (None, Err(e)) => return fail(format!("application failed: {}", e)),
            (None, Ok(_)) => {}
        }

        if self.unchanged && outcome.output.real_values() != outcome.initial.real_values() {
            return fail("output field was modified".to_string());
        }

        if let Some(tolerance) = self.satisfied {
            for (index, target) in outcome.targets.iter().enumerate() {
                let value = outcome.original_value(index);
                if !close(value, *target, tolerance) {
                    return fail(format!(
                        "constraint {} evaluates to {}, target {}",
                        index, value, target
                    ));
                }
            }
        }

        if let Some(tolerance) = self.orthonormal {
            let constraints = outcome.applicator.constraints();
            for (i, a) in constraints.iter().enumerate() {
                for (j, b) in constraints.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    let value = a.covector.inner_product(&b.covector);
                    if !close(value, Complex64::new(expected, 0.0), tolerance) {
                        return fail(format!("⟨α{}, α{}⟩ = {}, expected {}", i, j, value, expected));
                    }
                }
            }
        }

        Ok(())
    }
}

/// `|a - b| <= tolerance * max(1, |b|)`
pub fn close(a: Complex64, b: Complex64, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance * b.norm().max(1.0)
}
