//! Constant-altitude PPI and stacked 3-D grids.

use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;

use super::{record_or_skip, render, GridCoords, Sampler};
use crate::logging::log_timed_operation;
use crate::record::RadialRecord;
use crate::transform::cartesian_to_antenna;
use crate::volume::RadarVolume;

/// Samples the scan whose beam covers the target at height `z`.
pub struct CappiSampler<'a> {
    record: &'a RadialRecord,
    z: f64,
    antenna_height: f64,
    half_beam_width: f64,
}

impl<'a> CappiSampler<'a> {
    pub fn new(record: &'a RadialRecord, z: f64, antenna_height: f64, half_beam_width: f64) -> Self {
        Self {
            record,
            z,
            antenna_height,
            half_beam_width,
        }
    }
}

impl Sampler for CappiSampler<'_> {
    fn sample(&self, x: f64, y: f64) -> f32 {
        let (azimuth, range, elevation) = cartesian_to_antenna(x, y, self.z, self.antenna_height);
        self.record
            .interpolate_value(elevation, azimuth, range, self.half_beam_width)
    }

    fn name(&self) -> &str {
        "cappi"
    }
}

/// Values of `product` at height `z` over `grid`.
///
/// `half_beam_width` overrides half the site's vertical beam width.
pub fn cappi_with_beam(
    volume: &RadarVolume,
    product: &str,
    z: f64,
    grid: &GridCoords,
    half_beam_width: Option<f64>,
) -> Array2<f32> {
    let Some(record) = record_or_skip(volume, product, "cappi") else {
        return grid.nan_grid();
    };
    let sampler = CappiSampler::new(
        record,
        z,
        volume.site().antenna_height,
        half_beam_width.unwrap_or_else(|| volume.half_beam_width()),
    );
    render(&sampler, grid)
}

/// Values of `product` at height `z` over `grid`.
pub fn cappi(volume: &RadarVolume, product: &str, z: f64, grid: &GridCoords) -> Array2<f32> {
    log_timed_operation("cappi", || cappi_with_beam(volume, product, z, grid, None))
}

/// CAPPI at every height in `levels`, stacked as `[level, ny, nx]`.
pub fn grid_3d(
    volume: &RadarVolume,
    product: &str,
    levels: &[f64],
    grid: &GridCoords,
) -> Array3<f32> {
    log_timed_operation("grid_3d", || {
        let (ny, nx) = grid.shape();
        let mut out = Array3::from_elem((levels.len(), ny, nx), f32::NAN);
        if !volume.has_product(product) {
            tracing::debug!(product, "Returning empty 3-D grid");
            return out;
        }
        let planes: Vec<Array2<f32>> = levels
            .par_iter()
            .map(|&z| cappi_with_beam(volume, product, z, grid, None))
            .collect();
        for (mut level, plane) in out.axis_iter_mut(Axis(0)).zip(&planes) {
            level.assign(plane);
        }
        out
    })
}
