//! Composite reflectivity: the column maximum over all scans.

use ndarray::Array2;

use super::{record_or_skip, render, GridCoords, Sampler};
use crate::logging::log_timed_operation;
use crate::record::RadialRecord;
use crate::transform::{ground_to_slant_range, xy_to_azimuth};
use crate::volume::RadarVolume;

/// Largest finite value any scan's beam sees above a ground point.
pub struct CompositeSampler<'a> {
    record: &'a RadialRecord,
    antenna_height: f64,
}

impl<'a> CompositeSampler<'a> {
    pub fn new(record: &'a RadialRecord, antenna_height: f64) -> Self {
        Self {
            record,
            antenna_height,
        }
    }
}

impl Sampler for CompositeSampler<'_> {
    fn sample(&self, x: f64, y: f64) -> f32 {
        let azimuth = xy_to_azimuth(x, y);
        let distance = x.hypot(y);
        self.record
            .scans()
            .iter()
            .map(|scan| {
                let range =
                    ground_to_slant_range(distance, scan.fixed_elevation(), self.antenna_height);
                scan.get_value(azimuth, range)
            })
            .filter(|v| v.is_finite())
            .fold(f32::NAN, f32::max)
    }

    fn name(&self) -> &str {
        "composite"
    }
}

/// Column maximum of `product` over `grid`.
pub fn composite(volume: &RadarVolume, product: &str, grid: &GridCoords) -> Array2<f32> {
    log_timed_operation("composite", || {
        let Some(record) = record_or_skip(volume, product, "composite") else {
            return grid.nan_grid();
        };
        render(&CompositeSampler::new(record, volume.site().antenna_height), grid)
    })
}
