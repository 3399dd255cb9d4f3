//! Plan position indicator: one scan projected onto the ground.

use ndarray::Array2;

use super::{record_or_skip, render, GridCoords, Sampler};
use crate::logging::log_timed_operation;
use crate::record::Scan;
use crate::transform::{ground_to_slant_range, xy_to_azimuth};
use crate::volume::RadarVolume;

/// Samples one scan at the slant range its beam reaches each ground point.
pub struct PpiSampler<'a> {
    scan: &'a Scan,
    antenna_height: f64,
}

impl<'a> PpiSampler<'a> {
    pub fn new(scan: &'a Scan, antenna_height: f64) -> Self {
        Self {
            scan,
            antenna_height,
        }
    }
}

impl Sampler for PpiSampler<'_> {
    fn sample(&self, x: f64, y: f64) -> f32 {
        let azimuth = xy_to_azimuth(x, y);
        let range = ground_to_slant_range(
            x.hypot(y),
            self.scan.fixed_elevation(),
            self.antenna_height,
        );
        self.scan.get_value(azimuth, range)
    }

    fn name(&self) -> &str {
        "ppi"
    }
}

/// Scan `scan` of `product` on `grid`.
pub fn ppi(volume: &RadarVolume, product: &str, scan: usize, grid: &GridCoords) -> Array2<f32> {
    log_timed_operation("ppi", || {
        let Some(record) = record_or_skip(volume, product, "ppi") else {
            return grid.nan_grid();
        };
        let Some(scan) = record.scan(scan) else {
            tracing::debug!(product, scan, "No such scan");
            return grid.nan_grid();
        };
        render(&PpiSampler::new(scan, volume.site().antenna_height), grid)
    })
}
