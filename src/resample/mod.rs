//! Resampling polar volumes onto Cartesian grids and cross-sections.
//!
//! Every entry point takes a [`RadarVolume`], a product name and target
//! coordinates, and returns values in an `ndarray`. Resampling never fails:
//! a missing product yields an all-NaN result and points outside the data
//! are NaN.

pub mod cappi;
pub mod composite;
pub mod ppi;
pub mod vcs;

pub use cappi::{cappi, cappi_with_beam, grid_3d, CappiSampler};
pub use composite::{composite, CompositeSampler};
pub use ppi::{ppi, PpiSampler};
pub use vcs::{vcs, VcsMesh};

use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{RadarError, Result};
use crate::record::RadialRecord;
use crate::volume::RadarVolume;

/// Horizontal target coordinates in metres east (`x`) and north (`y`) of
/// the radar. Both arrays have the output shape `[ny, nx]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCoords {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl GridCoords {
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        if x.shape() != y.shape() {
            return Err(RadarError::InvalidParameter {
                param: "grid".to_string(),
                message: format!(
                    "x has shape {:?} but y has shape {:?}",
                    x.shape(),
                    y.shape()
                ),
            });
        }
        Ok(Self { x, y })
    }

    /// Mesh of every `(xs[j], ys[i])` pair, rows following `ys`.
    pub fn from_axes(xs: &[f64], ys: &[f64]) -> Self {
        let shape = (ys.len(), xs.len());
        Self {
            x: Array2::from_shape_fn(shape, |(_, j)| xs[j]),
            y: Array2::from_shape_fn(shape, |(i, _)| ys[i]),
        }
    }

    /// Square grid centred on the radar, `-half_extent..=half_extent` in
    /// both directions with the given spacing.
    pub fn regular(half_extent: f64, spacing: f64) -> Result<Self> {
        let valid = spacing.is_finite()
            && spacing > 0.0
            && half_extent.is_finite()
            && half_extent >= 0.0;
        if !valid {
            return Err(RadarError::InvalidParameter {
                param: "grid".to_string(),
                message: format!(
                    "spacing {} and extent {} must be positive",
                    spacing, half_extent
                ),
            });
        }
        let n = (2.0 * half_extent / spacing).floor() as usize + 1;
        let axis: Vec<f64> = (0..n).map(|i| -half_extent + i as f64 * spacing).collect();
        Ok(Self::from_axes(&axis, &axis))
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    pub(crate) fn nan_grid(&self) -> Array2<f32> {
        Array2::from_elem(self.shape(), f32::NAN)
    }
}

/// A value lookup at a horizontal position.
pub trait Sampler: Sync {
    /// Value at `(x, y)` metres from the radar, NaN when there is none.
    fn sample(&self, x: f64, y: f64) -> f32;

    /// Get the name of this sampling method
    fn name(&self) -> &str;
}

/// Evaluate `sampler` at every grid point, one row per rayon task.
pub fn render<S: Sampler>(sampler: &S, grid: &GridCoords) -> Array2<f32> {
    let (ny, nx) = grid.shape();
    let mut out = grid.nan_grid();
    debug!(sampler = sampler.name(), ny, nx, "Rendering grid");
    if let Some(values) = out.as_slice_mut() {
        values
            .par_chunks_mut(nx.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                for (j, value) in row.iter_mut().enumerate() {
                    *value = sampler.sample(grid.x[[i, j]], grid.y[[i, j]]);
                }
            });
    }
    out
}

/// Record of `product`, or `None` with a debug note when it is missing.
pub(crate) fn record_or_skip<'a>(
    volume: &'a RadarVolume,
    product: &str,
    operation: &str,
) -> Option<&'a RadialRecord> {
    match volume.record(product) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(operation, error = %e, "Returning empty result");
            None
        }
    }
}
