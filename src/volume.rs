//! Decoded radar volumes.
//!
//! A [`RadarVolume`] maps product names to [`RadialRecord`]s and carries the
//! site and task metadata the resampler needs. It is built once per file by a
//! [`VolumeBuilder`] and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RadarError, Result};
use crate::product::Channel;
use crate::reader::{RadarFormat, SiteOverride};
use crate::record::{RadialRecord, RecordBuilder};

/// Station metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub station_code: String,
    pub station_name: String,
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Antenna height above sea level in metres
    pub antenna_height: f64,
    /// Ground height above sea level in metres
    pub ground_height: f64,
    /// Radar subtype such as "SA" or "CC"
    pub radar_type: String,
    /// Vertical beam width in degrees
    pub beam_width_vertical: f64,
    /// Nominal log-channel gate size in metres
    pub log_resolution: f64,
    /// Nominal Doppler-channel gate size in metres
    pub doppler_resolution: f64,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            station_code: String::new(),
            station_name: String::new(),
            latitude: f64::NAN,
            longitude: f64::NAN,
            antenna_height: 0.0,
            ground_height: 0.0,
            radar_type: String::new(),
            beam_width_vertical: 1.0,
            log_resolution: f64::NAN,
            doppler_resolution: f64::NAN,
        }
    }
}

/// Scan task metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub task_name: String,
    pub scan_type: Option<i32>,
    pub scan_start: Option<DateTime<Utc>>,
    /// Nominal elevations of the declared cuts, in cut order
    pub cut_elevations: Vec<f64>,
}

/// Dimension sizes shared by all products
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDimensions {
    pub scan_count: usize,
    pub max_radial_count: usize,
    pub log_gate_count: usize,
    pub doppler_gate_count: usize,
}

/// A single site's decoded volume scan
#[derive(Debug, Clone)]
pub struct RadarVolume {
    format: RadarFormat,
    site: SiteInfo,
    task: TaskInfo,
    dimensions: VolumeDimensions,
    records: Vec<RadialRecord>,
    index: HashMap<String, usize>,
}

impl RadarVolume {
    pub fn format(&self) -> RadarFormat {
        self.format
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    pub fn task(&self) -> &TaskInfo {
        &self.task
    }

    pub fn dimensions(&self) -> VolumeDimensions {
        self.dimensions
    }

    /// Product names in the order they were first seen in the file.
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(RadialRecord::product)
    }

    pub fn records(&self) -> &[RadialRecord] {
        &self.records
    }

    pub fn has_product(&self, product: &str) -> bool {
        self.index.contains_key(product)
    }

    pub fn get_record(&self, product: &str) -> Option<&RadialRecord> {
        self.index.get(product).map(|&i| &self.records[i])
    }

    /// Record of a product, `MissingProduct` when absent.
    pub fn record(&self, product: &str) -> Result<&RadialRecord> {
        self.get_record(product)
            .ok_or_else(|| RadarError::MissingProduct {
                product: product.to_string(),
            })
    }

    pub fn half_beam_width(&self) -> f64 {
        self.site.beam_width_vertical / 2.0
    }

    pub(crate) fn apply_site_override(&mut self, overrides: &SiteOverride) {
        overrides.apply(&mut self.site);
    }
}

/// Accumulates records while a reader walks the stream.
#[derive(Debug)]
pub struct VolumeBuilder {
    format: RadarFormat,
    site: SiteInfo,
    task: TaskInfo,
    records: Vec<RecordBuilder>,
    index: HashMap<String, usize>,
}

impl VolumeBuilder {
    pub fn new(format: RadarFormat, site: SiteInfo, task: TaskInfo) -> Self {
        Self {
            format,
            site,
            task,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn site_mut(&mut self) -> &mut SiteInfo {
        &mut self.site
    }

    pub fn task_mut(&mut self) -> &mut TaskInfo {
        &mut self.task
    }

    /// Builder for `product`, created on first use.
    pub fn record_mut(&mut self, product: &str) -> &mut RecordBuilder {
        let next = self.records.len();
        let i = *self.index.entry(product.to_string()).or_insert(next);
        if i == next {
            self.records.push(RecordBuilder::new(product));
        }
        &mut self.records[i]
    }

    pub fn product_count(&self) -> usize {
        self.records.len()
    }

    /// Freeze the records and compute the shared dimensions.
    pub fn finish(self) -> Result<RadarVolume> {
        if self.records.is_empty() {
            return Err(RadarError::DataNotFound {
                message: format!("{} volume contains no radials", self.format),
            });
        }

        let records: Vec<RadialRecord> =
            self.records.into_iter().map(RecordBuilder::finish).collect();

        let mut dimensions = VolumeDimensions::default();
        for record in &records {
            dimensions.scan_count = dimensions.scan_count.max(record.scan_count());
            dimensions.max_radial_count = dimensions.max_radial_count.max(record.max_radial_count());
            let gates = record.max_gate_count();
            match record.channel() {
                Channel::Log => dimensions.log_gate_count = dimensions.log_gate_count.max(gates),
                Channel::Doppler => {
                    dimensions.doppler_gate_count = dimensions.doppler_gate_count.max(gates)
                }
            }
        }

        Ok(RadarVolume {
            format: self.format,
            site: self.site,
            task: self.task,
            dimensions,
            records,
            index: self.index,
        })
    }
}
