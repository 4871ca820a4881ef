//! Scenario definition and execution.

use std::ops::Range;
use std::sync::Arc;

use conic_constraint::{
    Application, ApplicatorConfig, ConstraintApplicator, ConstraintResult,
};
use conic_field::{Complex64, Field, MultiLevelContext, MultiLevelField};

use crate::error::ScenarioResult;
use crate::expectation::Expectation;
use crate::fixture::{hierarchy, random_covector, region_mean, white_noise};
use crate::recorder::RecordingObserver;

/// How a scenario builds one covector.
#[derive(Debug, Clone)]
pub enum CovectorSpec {
    Random { seed: u64 },
    RegionMean { level: usize, cells: Range<usize> },
}

#[derive(Debug, Clone)]
struct ConstraintSpec {
    covector: CovectorSpec,
    scale: f64,
    target: f64,
}

/// A constrained realization to build, apply and check.
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    levels: Vec<usize>,
    seed: u64,
    config: ApplicatorConfig,
    constraints: Vec<ConstraintSpec>,
    expectation: Expectation,
}

impl Scenario {
    /// Two levels (16 and 32 cells), seed 1, strict configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: vec![16, 32],
            seed: 1,
            config: ApplicatorConfig::strict(),
            constraints: Vec::new(),
            expectation: Expectation::new(),
        }
    }

    pub fn levels(mut self, sizes: &[usize]) -> Self {
        self.levels = sizes.to_vec();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(mut self, config: ApplicatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Constrain a random covector.
    pub fn random(self, seed: u64, target: f64) -> Self {
        self.random_scaled(seed, 1.0, target)
    }

    /// Constrain `scale` times a random covector.
    pub fn random_scaled(mut self, seed: u64, scale: f64, target: f64) -> Self {
        self.constraints.push(ConstraintSpec {
            covector: CovectorSpec::Random { seed },
            scale,
            target,
        });
        self
    }

    /// Constrain the mean over `cells` of `level`.
    pub fn mean(mut self, level: usize, cells: Range<usize>, target: f64) -> Self {
        self.constraints.push(ConstraintSpec {
            covector: CovectorSpec::RegionMean { level, cells },
            scale: 1.0,
            target,
        });
        self
    }

    pub fn expect(mut self, build: impl FnOnce(Expectation) -> Expectation) -> Self {
        self.expectation = build(self.expectation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build everything and apply the constraints, without checking.
    pub fn execute(&self) -> ScenarioResult<Outcome> {
        let context = hierarchy(&self.levels)?;
        let initial = white_noise(&context, self.seed)?;
        let mut output = initial.clone();

        let mut applicator = ConstraintApplicator::with_observer(
            self.config.clone(),
            RecordingObserver::new(),
        );
        let mut originals = Vec::with_capacity(self.constraints.len());
        let mut targets = Vec::with_capacity(self.constraints.len());

        for spec in &self.constraints {
            let mut covector = match &spec.covector {
                CovectorSpec::Random { seed } => random_covector(&context, *seed)?,
                CovectorSpec::RegionMean { level, cells } => {
                    region_mean(&context, *level, cells.clone())?
                }
            };
            covector.scale(Complex64::new(spec.scale, 0.0));

            let target = Complex64::new(spec.target, 0.0);
            let existing = covector.inner_product(&output);
            originals.push(covector.clone());
            targets.push(target);
            applicator.add_constraint(covector, target, existing)?;
        }

        let result = applicator.apply(&mut output);

        Ok(Outcome {
            context,
            initial,
            output,
            originals,
            targets,
            applicator,
            result,
        })
    }

    /// Execute and verify the expectation.
    pub fn run(&self) -> ScenarioResult<Outcome> {
        let outcome = self.execute()?;
        self.expectation.verify(&self.name, &outcome)?;
        Ok(outcome)
    }
}

/// Everything produced by a scenario run.
pub struct Outcome {
    pub context: Arc<MultiLevelContext>,
    pub initial: MultiLevelField,
    pub output: MultiLevelField,
    /// Covectors as they were before orthonormalisation.
    pub originals: Vec<MultiLevelField>,
    pub targets: Vec<Complex64>,
    pub applicator: ConstraintApplicator<MultiLevelField, RecordingObserver>,
    pub result: ConstraintResult<Application<Complex64>>,
}

impl Outcome {
    /// Value of original functional `index` on the output field.
    pub fn original_value(&self, index: usize) -> Complex64 {
        self.originals[index].inner_product(&self.output)
    }

    pub fn observer(&self) -> &RecordingObserver {
        self.applicator.observer()
    }
}
