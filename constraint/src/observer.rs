//! Diagnostic side channel.
//!
//! Nothing reported here feeds back into the computation. Observers see
//! progress ticks, the starting/target values and real parts of the
//! diagnostic matrices.

use std::fmt::Write as _;
use std::io;

use ndarray::Array2;
use tracing::{debug, info, warn};

/// Long-running phases that report progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Covariance,
    Orthogonalise,
    Apply,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Covariance => "calculating covariance",
            Stage::Orthogonalise => "orthogonalizing constraints",
            Stage::Apply => "applying constraints",
        }
    }
}

/// Receives diagnostics from the constraint engine. Every method defaults to
/// doing nothing.
pub trait ConstraintObserver {
    /// `done` out of `total` operations of `stage` have completed.
    fn progress(&mut self, _stage: Stage, _done: usize, _total: usize) {}

    /// Real parts of the starting values and targets, before
    /// orthonormalisation.
    fn values(&mut self, _existing: &[f64], _targets: &[f64]) {}

    /// A named diagnostic matrix (`cov_matr`, `chi2_matr`).
    fn matrix(&mut self, _name: &str, _matrix: &Array2<f64>) {}
}

impl<O: ConstraintObserver + ?Sized> ConstraintObserver for &mut O {
    fn progress(&mut self, stage: Stage, done: usize, total: usize) {
        (**self).progress(stage, done, total);
    }

    fn values(&mut self, existing: &[f64], targets: &[f64]) {
        (**self).values(existing, targets);
    }

    fn matrix(&mut self, name: &str, matrix: &Array2<f64>) {
        (**self).matrix(name, matrix);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ConstraintObserver for NullObserver {}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ConstraintObserver for TracingObserver {
    fn progress(&mut self, stage: Stage, done: usize, total: usize) {
        debug!(stage = stage.label(), done, total, "constraint progress");
    }

    fn values(&mut self, existing: &[f64], targets: &[f64]) {
        info!(v0 = ?existing, v1 = ?targets, "constraint values");
    }

    fn matrix(&mut self, name: &str, matrix: &Array2<f64>) {
        info!("\n{}", format_matrix(name, matrix));
    }
}

/// Writes the nested-list dumps to a stream. Write failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct WriterObserver<W: io::Write> {
    writer: W,
}

impl<W: io::Write> WriterObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{}", text) {
            warn!(error = %e, "failed to write constraint diagnostics");
        }
    }
}

impl<W: io::Write> ConstraintObserver for WriterObserver<W> {
    fn values(&mut self, existing: &[f64], targets: &[f64]) {
        let text = format!("v0={}\nv1={}", format_row(existing), format_row(targets));
        self.emit(&text);
    }

    fn matrix(&mut self, name: &str, matrix: &Array2<f64>) {
        let text = format_matrix(name, matrix);
        self.emit(&text);
    }
}

/// Render `name = [[a,b],\n[c,d]]`.
pub fn format_matrix(name: &str, matrix: &Array2<f64>) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .into_iter()
        .map(|row| format_row(&row.to_vec()))
        .collect();
    format!("{} = [{}]", name, rows.join(",\n"))
}

fn format_row(values: &[f64]) -> String {
    let mut out = String::from("[");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", value);
    }
    out.push(']');
    out
}
