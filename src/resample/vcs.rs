//! Vertical cross-sections along a horizontal segment.

use ndarray::Array2;
use rayon::prelude::*;

use super::record_or_skip;
use crate::logging::log_timed_operation;
use crate::record::Scan;
use crate::transform::{beam_height, ground_to_slant_range, xy_to_azimuth};
use crate::volume::RadarVolume;

/// Cross-section samples, one row per scan and one column per point along
/// the segment.
#[derive(Debug, Clone, Default)]
pub struct VcsMesh {
    /// Distance of each column from the segment start, metres
    pub distance: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Fixed elevation of each row
    pub elevations: Vec<f64>,
    pub values: Array2<f32>,
    /// Height of the lower beam edge
    pub z_low: Array2<f64>,
    /// Height of the upper beam edge
    pub z_high: Array2<f64>,
}

impl VcsMesh {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(scans, samples)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

struct ScanRow {
    values: Vec<f32>,
    z_low: Vec<f64>,
    z_high: Vec<f64>,
}

fn scan_row(scan: &Scan, xs: &[f64], ys: &[f64], h: f64, half_beam_width: f64) -> ScanRow {
    let elevation = scan.fixed_elevation();
    let mut row = ScanRow {
        values: Vec::with_capacity(xs.len()),
        z_low: Vec::with_capacity(xs.len()),
        z_high: Vec::with_capacity(xs.len()),
    };
    for (&x, &y) in xs.iter().zip(ys) {
        let range = ground_to_slant_range(x.hypot(y), elevation, h);
        row.values.push(scan.get_value(xy_to_azimuth(x, y), range));
        row.z_low.push(beam_height(range, elevation - half_beam_width, h));
        row.z_high.push(beam_height(range, elevation + half_beam_width, h));
    }
    row
}

/// Cross-section of `product` from `start` to `end`, both `(x, y)` metres
/// from the radar. Samples are spaced by the product's native gate spacing.
pub fn vcs(volume: &RadarVolume, product: &str, start: (f64, f64), end: (f64, f64)) -> VcsMesh {
    log_timed_operation("vcs", || {
        let Some(record) = record_or_skip(volume, product, "vcs") else {
            return VcsMesh::default();
        };
        let spacing = match record.gate_spacing() {
            Some(s) if s > 0.0 => s,
            _ => {
                tracing::debug!(product, "No gate spacing for cross-section");
                return VcsMesh::default();
            }
        };

        let length = (end.0 - start.0).hypot(end.1 - start.1);
        let samples = (length / spacing).floor() as usize + 1;
        let fraction = |i: usize| {
            if length > 0.0 {
                (i as f64 * spacing / length).min(1.0)
            } else {
                0.0
            }
        };
        let distance: Vec<f64> = (0..samples).map(|i| fraction(i) * length).collect();
        let x: Vec<f64> = (0..samples)
            .map(|i| start.0 + fraction(i) * (end.0 - start.0))
            .collect();
        let y: Vec<f64> = (0..samples)
            .map(|i| start.1 + fraction(i) * (end.1 - start.1))
            .collect();

        let h = volume.site().antenna_height;
        let half_beam_width = volume.half_beam_width();
        let rows: Vec<ScanRow> = record
            .scans()
            .par_iter()
            .map(|scan| scan_row(scan, &x, &y, h, half_beam_width))
            .collect();

        let shape = (rows.len(), samples);
        VcsMesh {
            elevations: record.fixed_elevations(),
            values: Array2::from_shape_fn(shape, |(i, j)| rows[i].values[j]),
            z_low: Array2::from_shape_fn(shape, |(i, j)| rows[i].z_low[j]),
            z_high: Array2::from_shape_fn(shape, |(i, j)| rows[i].z_high[j]),
            distance,
            x,
            y,
        }
    })
}
