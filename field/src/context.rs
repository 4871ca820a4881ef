//! Grid hierarchy description for the reference multi-level field.

use std::fmt;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::error::{FieldError, FieldResult};

/// Per-level cell counts. Two fields are compatible iff their layouts match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    level_sizes: Vec<usize>,
}

impl Layout {
    pub fn new(level_sizes: Vec<usize>) -> Self {
        Self { level_sizes }
    }

    pub fn num_levels(&self) -> usize {
        self.level_sizes.len()
    }

    pub fn level_sizes(&self) -> &[usize] {
        &self.level_sizes
    }

    pub fn num_cells(&self) -> usize {
        self.level_sizes.iter().sum()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.level_sizes)
    }
}

/// One resolution level.
///
/// `spectrum[k]` is the variance of Fourier mode `k` on this level. Spectra
/// are split between levels by the caller so that every physical mode is
/// counted on exactly one level.
#[derive(Debug, Clone)]
pub struct GridLevel {
    spectrum: Vec<f64>,
}

impl GridLevel {
    pub fn new(spectrum: Vec<f64>) -> Self {
        Self { spectrum }
    }

    /// Level with `cells` modes, each of unit variance.
    pub fn white(cells: usize) -> Self {
        Self::new(vec![1.0; cells])
    }

    /// Level with a power-law spectrum `amplitude * max(k, 1)^index`, using the
    /// symmetric wavenumber `min(k, n - k)`.
    pub fn power_law(cells: usize, amplitude: f64, index: f64) -> Self {
        let spectrum = (0..cells)
            .map(|k| {
                let kk = k.min(cells - k).max(1) as f64;
                amplitude * kk.powf(index)
            })
            .collect();
        Self::new(spectrum)
    }

    pub fn cells(&self) -> usize {
        self.spectrum.len()
    }

    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }
}

struct Plans {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

/// Immutable grid hierarchy shared by every field defined on it.
pub struct MultiLevelContext {
    levels: Vec<GridLevel>,
    layout: Layout,
    plans: Vec<Plans>,
}

impl MultiLevelContext {
    pub fn builder() -> MultiLevelContextBuilder {
        MultiLevelContextBuilder::new()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[GridLevel] {
        &self.levels
    }

    pub fn num_cells(&self) -> usize {
        self.layout.num_cells()
    }

    pub(crate) fn forward(&self, level: usize) -> &dyn Fft<f64> {
        self.plans[level].forward.as_ref()
    }

    pub(crate) fn inverse(&self, level: usize) -> &dyn Fft<f64> {
        self.plans[level].inverse.as_ref()
    }
}

impl fmt::Debug for MultiLevelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLevelContext")
            .field("layout", &self.layout)
            .finish()
    }
}

/// Builder for [`MultiLevelContext`], coarsest level first.
#[derive(Debug, Default)]
pub struct MultiLevelContextBuilder {
    levels: Vec<GridLevel>,
}

impl MultiLevelContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: GridLevel) -> Self {
        self.levels.push(level);
        self
    }

    pub fn build(self) -> FieldResult<Arc<MultiLevelContext>> {
        if self.levels.is_empty() {
            return Err(FieldError::EmptyHierarchy);
        }

        for (index, level) in self.levels.iter().enumerate() {
            if level.cells() == 0 {
                return Err(FieldError::EmptyLevel { level: index });
            }
            if let Some((mode, &value)) = level
                .spectrum
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(FieldError::InvalidSpectrum {
                    level: index,
                    mode,
                    value,
                });
            }
        }

        let mut planner = FftPlanner::<f64>::new();
        let plans = self
            .levels
            .iter()
            .map(|level| Plans {
                forward: planner.plan_fft_forward(level.cells()),
                inverse: planner.plan_fft_inverse(level.cells()),
            })
            .collect();
        let layout = Layout::new(self.levels.iter().map(GridLevel::cells).collect());

        Ok(Arc::new(MultiLevelContext {
            levels: self.levels,
            layout,
            plans,
        }))
    }
}
