//! Per-product polar volumes.
//!
//! A [`RadialRecord`] holds every scan of one product in acquisition order.
//! Records are assembled by a [`RecordBuilder`] while a format reader walks
//! the byte stream, then frozen so that resampling can read them from many
//! threads at once.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RadarError, Result};
use crate::product::{self, Channel};

/// Linear code to physical value transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeTransform {
    pub scale: f64,
    pub offset: f64,
    /// Codes below this value carry no data; 0 never does.
    pub no_data_below: u16,
}

impl CodeTransform {
    /// `physical = raw * scale + offset`
    pub fn direct(scale: f64, offset: f64, no_data_below: u16) -> Self {
        Self {
            scale,
            offset,
            no_data_below,
        }
    }

    /// Build from headers that store `physical = (raw - offset) / scale`.
    pub fn inverse(scale: f64, offset: f64, no_data_below: u16) -> Self {
        Self {
            scale: 1.0 / scale,
            offset: -offset / scale,
            no_data_below,
        }
    }

    pub fn is_missing(&self, raw: u16) -> bool {
        raw == 0 || raw < self.no_data_below
    }

    pub fn decode(&self, raw: u16) -> f32 {
        if self.is_missing(raw) {
            return f32::NAN;
        }
        (raw as f64 * self.scale + self.offset) as f32
    }
}

/// Raw gate codes of one radial.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGates {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl RawGates {
    pub fn len(&self) -> usize {
        match self {
            RawGates::U8(v) => v.len(),
            RawGates::U16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code at `gate`, `None` past the stored length.
    pub fn get(&self, gate: usize) -> Option<u16> {
        match self {
            RawGates::U8(v) => v.get(gate).map(|&c| c as u16),
            RawGates::U16(v) => v.get(gate).copied(),
        }
    }
}

/// Smallest angular distance between two azimuths in degrees.
pub fn azimuth_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// One elevation cut of a product.
#[derive(Debug, Clone)]
pub struct Scan {
    fixed_elevation: f64,
    azimuths: Vec<f64>,
    elevations: Vec<f64>,
    range_axis: Vec<f64>,
    radials: Vec<RawGates>,
    transform: CodeTransform,
    /// (azimuth, radial index) sorted for lookup
    azimuth_index: Vec<(f64, usize)>,
}

impl Scan {
    pub fn fixed_elevation(&self) -> f64 {
        self.fixed_elevation
    }

    pub fn azimuths(&self) -> &[f64] {
        &self.azimuths
    }

    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    /// Gate centre distances in metres.
    pub fn range_axis(&self) -> &[f64] {
        &self.range_axis
    }

    pub fn radials(&self) -> &[RawGates] {
        &self.radials
    }

    pub fn transform(&self) -> CodeTransform {
        self.transform
    }

    pub fn radial_count(&self) -> usize {
        self.radials.len()
    }

    pub fn gate_count(&self) -> usize {
        self.range_axis.len()
    }

    /// Distance between the first two gates.
    pub fn gate_spacing(&self) -> Option<f64> {
        match self.range_axis.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }

    /// Radial closest to `azimuth` on the circle; ties go to the lower index.
    pub fn nearest_radial(&self, azimuth: f64) -> Option<usize> {
        let n = self.azimuth_index.len();
        if n == 0 {
            return None;
        }
        let target = azimuth.rem_euclid(360.0);
        let upper = self.azimuth_index.partition_point(|&(a, _)| a < target) % n;
        let mut lower = (upper + n - 1) % n;
        let lower_azimuth = self.azimuth_index[lower].0;
        while lower > 0 && self.azimuth_index[lower - 1].0 == lower_azimuth {
            lower -= 1;
        }

        let (up_az, up_idx) = self.azimuth_index[upper];
        let (low_az, low_idx) = self.azimuth_index[lower];
        let up_dist = azimuth_distance(up_az, target);
        let low_dist = azimuth_distance(low_az, target);
        let best = if up_dist < low_dist || (up_dist == low_dist && up_idx < low_idx) {
            up_idx
        } else {
            low_idx
        };
        Some(best)
    }

    /// Gate closest to `range`, `None` when more than half a gate off the axis.
    pub fn nearest_gate(&self, range: f64) -> Option<usize> {
        let axis = &self.range_axis;
        if axis.is_empty() || !range.is_finite() {
            return None;
        }
        let p = axis.partition_point(|&g| g < range);
        let gate = if p == 0 {
            0
        } else if p == axis.len() {
            axis.len() - 1
        } else if (axis[p] - range) < (range - axis[p - 1]) {
            p
        } else {
            p - 1
        };

        let half = self.gate_spacing().unwrap_or(axis[0].abs()).abs() / 2.0;
        if (axis[gate] - range).abs() > half + 1e-6 {
            return None;
        }
        Some(gate)
    }

    /// Physical value of one gate, NaN past the radial's stored length.
    pub fn value_at(&self, radial: usize, gate: usize) -> f32 {
        self.radials
            .get(radial)
            .and_then(|r| r.get(gate))
            .map(|raw| self.transform.decode(raw))
            .unwrap_or(f32::NAN)
    }

    pub fn get_value(&self, azimuth: f64, range: f64) -> f32 {
        match (self.nearest_radial(azimuth), self.nearest_gate(range)) {
            (Some(radial), Some(gate)) => self.value_at(radial, gate),
            _ => f32::NAN,
        }
    }

    /// Physical values of one radial padded with NaN to `width` gates.
    pub fn radial_values(&self, radial: usize, width: usize) -> Vec<f32> {
        (0..width).map(|gate| self.value_at(radial, gate)).collect()
    }
}

/// One product's full polar volume
#[derive(Debug, Clone)]
pub struct RadialRecord {
    product: String,
    channel: Channel,
    scans: Vec<Scan>,
}

impl RadialRecord {
    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    pub fn scan(&self, index: usize) -> Option<&Scan> {
        self.scans.get(index)
    }

    pub fn scan_count(&self) -> usize {
        self.scans.len()
    }

    pub fn fixed_elevations(&self) -> Vec<f64> {
        self.scans.iter().map(Scan::fixed_elevation).collect()
    }

    pub fn max_radial_count(&self) -> usize {
        self.scans.iter().map(Scan::radial_count).max().unwrap_or(0)
    }

    pub fn max_gate_count(&self) -> usize {
        self.scans.iter().map(Scan::gate_count).max().unwrap_or(0)
    }

    /// Transform of the first scan.
    pub fn code_transform(&self) -> Option<CodeTransform> {
        self.scans.first().map(Scan::transform)
    }

    /// Native gate spacing of the first scan that has one.
    pub fn gate_spacing(&self) -> Option<f64> {
        self.scans.iter().find_map(Scan::gate_spacing)
    }

    /// Scan whose fixed elevation is closest to `elevation`; ties go to the
    /// first acquired.
    pub fn nearest_scan_index(&self, elevation: f64) -> Option<usize> {
        if !elevation.is_finite() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, scan) in self.scans.iter().enumerate() {
            let diff = (scan.fixed_elevation - elevation).abs();
            if best.map_or(true, |(_, d)| diff < d) {
                best = Some((i, diff));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Nearest-neighbour value of a scan in azimuth and range.
    pub fn get_value(&self, scan: usize, azimuth: f64, range: f64) -> f32 {
        self.scans
            .get(scan)
            .map(|s| s.get_value(azimuth, range))
            .unwrap_or(f32::NAN)
    }

    /// Value at an arbitrary antenna position; NaN outside every beam.
    pub fn interpolate_value(
        &self,
        elevation: f64,
        azimuth: f64,
        range: f64,
        half_beam_width: f64,
    ) -> f32 {
        let Some(index) = self.nearest_scan_index(elevation) else {
            return f32::NAN;
        };
        let offset = (self.scans[index].fixed_elevation - elevation).abs();
        if half_beam_width.is_nan() || offset > half_beam_width {
            return f32::NAN;
        }
        self.get_value(index, azimuth, range)
    }
}

#[derive(Debug)]
struct ScanBuilder {
    cut_id: usize,
    fixed_elevation: Option<f64>,
    azimuths: Vec<f64>,
    elevations: Vec<f64>,
    range_axis: Vec<f64>,
    radials: Vec<RawGates>,
    transform: CodeTransform,
}

impl ScanBuilder {
    fn finish(self) -> Scan {
        let fixed_elevation = self.fixed_elevation.unwrap_or_else(|| {
            if self.elevations.is_empty() {
                f64::NAN
            } else {
                let mean = self.elevations.iter().sum::<f64>() / self.elevations.len() as f64;
                (mean * 100.0).round() / 100.0
            }
        });

        let mut azimuth_index: Vec<(f64, usize)> = self
            .azimuths
            .iter()
            .map(|a| a.rem_euclid(360.0))
            .enumerate()
            .map(|(i, a)| (a, i))
            .collect();
        azimuth_index.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        Scan {
            fixed_elevation,
            azimuths: self.azimuths,
            elevations: self.elevations,
            range_axis: self.range_axis,
            radials: self.radials,
            transform: self.transform,
            azimuth_index,
        }
    }
}

/// Incrementally populated [`RadialRecord`].
#[derive(Debug)]
pub struct RecordBuilder {
    product: String,
    channel: Channel,
    scans: Vec<ScanBuilder>,
}

impl RecordBuilder {
    pub fn new(product: impl Into<String>) -> Self {
        let product = product.into();
        let channel = product::channel_of(&product);
        Self {
            product,
            channel,
            scans: Vec::new(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// True when a radial of cut `cut_id` must open a new scan.
    pub fn needs_scan(&self, cut_id: usize) -> bool {
        self.scans.last().map_or(true, |s| s.cut_id != cut_id)
    }

    /// Open a new scan. Without a fixed elevation the mean radial elevation
    /// is used when the record is finished.
    pub fn begin_scan(
        &mut self,
        cut_id: usize,
        fixed_elevation: Option<f64>,
        range_axis: Vec<f64>,
        transform: CodeTransform,
    ) {
        self.scans.push(ScanBuilder {
            cut_id,
            fixed_elevation,
            azimuths: Vec::new(),
            elevations: Vec::new(),
            range_axis,
            radials: Vec::new(),
            transform,
        });
    }

    /// Append a radial to the current scan.
    pub fn push_radial(&mut self, azimuth: f64, elevation: f64, gates: RawGates) -> Result<()> {
        let scan = self
            .scans
            .last_mut()
            .ok_or_else(|| RadarError::DataNotFound {
                message: format!("radial for {} arrived before any scan", self.product),
            })?;
        if gates.len() > scan.range_axis.len() {
            warn!(
                product = %self.product,
                gates = gates.len(),
                axis = scan.range_axis.len(),
                "Radial longer than the scan's range axis"
            );
        }
        scan.azimuths.push(azimuth);
        scan.elevations.push(elevation);
        scan.radials.push(gates);
        Ok(())
    }

    pub fn finish(self) -> RadialRecord {
        RadialRecord {
            product: self.product,
            channel: self.channel,
            scans: self.scans.into_iter().map(ScanBuilder::finish).collect(),
        }
    }
}

/// Uniform range axis `first + i * spacing`.
pub fn range_axis(first: f64, spacing: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| first + i as f64 * spacing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(scans: Vec<(f64, Vec<f64>, Vec<Vec<u8>>)>) -> RadialRecord {
        let mut builder = RecordBuilder::new("dBZ");
        for (cut, (elevation, azimuths, radials)) in scans.iter().enumerate() {
            let gates = radials.first().map_or(0, Vec::len);
            builder.begin_scan(
                cut,
                Some(*elevation),
                range_axis(1000.0, 1000.0, gates),
                CodeTransform::direct(0.5, -33.0, 2),
            );
            for (az, raw) in azimuths.iter().zip(radials) {
                builder
                    .push_radial(*az, *elevation, RawGates::U8(raw.clone()))
                    .unwrap();
            }
        }
        builder.finish()
    }

    #[test]
    fn test_code_transform_conventions() {
        let direct = CodeTransform::direct(0.5, -33.0, 2);
        assert_eq!(direct.decode(20), -23.0);
        assert!(direct.decode(0).is_nan());
        assert!(direct.decode(1).is_nan());

        let inverse = CodeTransform::inverse(2.0, 66.0, 5);
        assert_eq!(inverse.scale, 0.5);
        assert_eq!(inverse.offset, -33.0);
        assert_eq!(inverse.decode(70), 2.0);
        assert!(inverse.decode(4).is_nan());
    }

    #[test]
    fn test_get_value_nearest_gate_and_radial() {
        let record = record_with(vec![(
            0.5,
            vec![0.0, 90.0],
            vec![vec![10, 20, 30, 40], vec![50, 60, 70, 80]],
        )]);
        assert_eq!(record.get_value(0, 0.0, 1000.0), -28.0);
        assert_eq!(record.get_value(0, 0.0, 2000.0), -23.0);
        assert_eq!(record.get_value(0, 90.0, 3000.0), 2.0);
        assert_eq!(record.get_value(0, 80.0, 3400.0), 2.0);
        // beyond the last gate
        assert!(record.get_value(0, 0.0, 9000.0).is_nan());
        // unknown scan
        assert!(record.get_value(3, 0.0, 1000.0).is_nan());
    }

    #[test]
    fn test_azimuth_wrap_is_symmetric() {
        let azimuths: Vec<f64> = (0..360).map(|a| a as f64 + 0.5).collect();
        let radials: Vec<Vec<u8>> = (0..360).map(|i| vec![(i % 250 + 2) as u8]).collect();
        let record = record_with(vec![(0.5, azimuths, radials)]);
        let scan = record.scan(0).unwrap();

        assert_eq!(scan.nearest_radial(359.9), Some(359));
        assert_eq!(scan.nearest_radial(0.1), Some(0));
        assert_eq!(scan.nearest_radial(-0.1), Some(359));
        assert_eq!(scan.nearest_radial(360.1), Some(0));
        // 0.0 is equidistant from 359.5 and 0.5; the lower radial index wins
        assert_eq!(scan.nearest_radial(0.0), Some(0));
    }

    #[test]
    fn test_truncated_radial_reads_missing() {
        let record = record_with(vec![(0.5, vec![0.0, 90.0], vec![vec![10, 20, 30, 40], vec![50]])]);
        assert_eq!(record.get_value(0, 90.0, 1000.0), -8.0);
        assert!(record.get_value(0, 90.0, 2000.0).is_nan());
    }

    #[test]
    fn test_nearest_scan_ties_to_first() {
        let record = record_with(vec![
            (0.5, vec![0.0], vec![vec![10]]),
            (1.5, vec![0.0], vec![vec![20]]),
            (1.5, vec![0.0], vec![vec![30]]),
        ]);
        assert_eq!(record.nearest_scan_index(1.0), Some(0));
        assert_eq!(record.nearest_scan_index(1.6), Some(1));
        assert_eq!(record.nearest_scan_index(-3.0), Some(0));
        assert_eq!(record.fixed_elevations(), vec![0.5, 1.5, 1.5]);
    }

    #[test]
    fn test_interpolate_value_respects_beam() {
        let record = record_with(vec![
            (0.5, vec![0.0], vec![vec![10, 20]]),
            (2.4, vec![0.0], vec![vec![30, 40]]),
        ]);
        assert_eq!(record.interpolate_value(0.9, 0.0, 1000.0, 0.5), -28.0);
        assert_eq!(record.interpolate_value(2.0, 0.0, 2000.0, 0.5), -13.0);
        assert!(record.interpolate_value(1.45, 0.0, 1000.0, 0.5).is_nan());
        assert!(record.interpolate_value(10.0, 0.0, 1000.0, 0.5).is_nan());

        assert_eq!(record.nearest_scan_index(f64::NAN), None);
        assert!(record.interpolate_value(f64::NAN, 0.0, 1000.0, 0.5).is_nan());
        assert!(record.interpolate_value(f64::INFINITY, 0.0, 1000.0, 90.0).is_nan());
        assert!(record.interpolate_value(0.5, 0.0, 1000.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_builder_scan_boundaries() {
        let mut builder = RecordBuilder::new("V");
        assert_eq!(builder.channel(), Channel::Doppler);
        assert!(builder.needs_scan(0));
        assert!(builder
            .push_radial(0.0, 0.5, RawGates::U8(vec![1]))
            .is_err());

        builder.begin_scan(0, None, range_axis(0.0, 250.0, 2), CodeTransform::direct(1.0, 0.0, 1));
        assert!(!builder.needs_scan(0));
        builder.push_radial(0.0, 0.4, RawGates::U16(vec![3, 4])).unwrap();
        builder.push_radial(1.0, 0.6, RawGates::U16(vec![5, 6])).unwrap();
        assert!(builder.needs_scan(1));

        let record = builder.finish();
        let scan = record.scan(0).unwrap();
        assert_eq!(scan.fixed_elevation(), 0.5);
        assert_eq!(scan.radial_count(), 2);
        assert_eq!(scan.gate_spacing(), Some(250.0));
        let values = scan.radial_values(1, 3);
        assert_eq!(values[0], 5.0);
        assert_eq!(values[1], 6.0);
        assert!(values[2].is_nan());
    }
}
