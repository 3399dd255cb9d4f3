//! Generic array view of a decoded volume.
//!
//! External array readers address data by variable name and index ranges.
//! Variables are named after the product and the 0-based scan:
//!
//! - `"dBZ"`: `[scan, radial, gate]`, padded with NaN
//! - `"dBZ_s3"`: `[radial, gate]` of scan 3
//! - `"dBZ_s3_azimuth"`, `"dBZ_s3_elevation"`, `"dBZ_s3_distance"`: 1-D
//!   coordinates of scan 3

use ndarray::{Array1, Array2, Array3, ArrayD, Slice};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RadarError, Result};
use crate::product::{self, Channel};
use crate::record::{RadialRecord, Scan};
use crate::volume::RadarVolume;

/// Metadata about a dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    /// Name of the dimension
    pub name: String,
    /// Size of the dimension
    pub size: usize,
}

/// Metadata about a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Name of the variable
    pub name: String,
    /// Dimensions of the variable
    pub dimensions: Vec<String>,
    /// Shape of the variable (dimension sizes)
    pub shape: Vec<usize>,
    /// Variable attributes
    pub attributes: HashMap<String, AttributeValue>,
    /// Data type as string
    pub dtype: String,
}

/// Possible attribute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

/// Complete metadata for a volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Volume-level attributes
    pub global_attributes: HashMap<String, AttributeValue>,
    /// Shared dimensions
    pub dimensions: HashMap<String, Dimension>,
    /// Variables available through [`RadarVolume::read`]
    pub variables: HashMap<String, Variable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coordinate {
    Azimuth,
    Elevation,
    Distance,
}

impl Coordinate {
    fn suffix(self) -> &'static str {
        match self {
            Coordinate::Azimuth => "azimuth",
            Coordinate::Elevation => "elevation",
            Coordinate::Distance => "distance",
        }
    }
}

#[derive(Debug, PartialEq)]
enum VariableRef<'a> {
    Volume(&'a str),
    Scan(&'a str, usize),
    Coordinate(&'a str, usize, Coordinate),
}

fn parse_variable(name: &str) -> VariableRef<'_> {
    for coord in [Coordinate::Azimuth, Coordinate::Elevation, Coordinate::Distance] {
        if let Some(stem) = name
            .strip_suffix(coord.suffix())
            .and_then(|s| s.strip_suffix('_'))
        {
            if let VariableRef::Scan(product, scan) = parse_variable(stem) {
                return VariableRef::Coordinate(product, scan, coord);
            }
        }
    }
    if let Some((product, scan)) = name.rsplit_once("_s") {
        if let Ok(scan) = scan.parse::<usize>() {
            return VariableRef::Scan(product, scan);
        }
    }
    VariableRef::Volume(name)
}

fn gate_dimension(channel: Channel) -> &'static str {
    match channel {
        Channel::Log => "gate_log",
        Channel::Doppler => "gate_doppler",
    }
}

impl RadarVolume {
    fn scan_of<'a>(&'a self, product: &str, scan: usize) -> Result<(&'a RadialRecord, &'a Scan)> {
        let record = self.record(product)?;
        let s = record.scan(scan).ok_or_else(|| RadarError::DataNotFound {
            message: format!(
                "{} has {} scans, scan {} requested",
                product,
                record.scan_count(),
                scan
            ),
        })?;
        Ok((record, s))
    }

    /// Read a whole variable as physical values.
    pub fn read(&self, name: &str) -> Result<ArrayD<f32>> {
        match parse_variable(name) {
            VariableRef::Volume(product) => {
                let record = self.record(product)?;
                let radials = record.max_radial_count();
                let gates = record.max_gate_count();
                let mut array = Array3::<f32>::from_elem((record.scan_count(), radials, gates), f32::NAN);
                for (s, scan) in record.scans().iter().enumerate() {
                    for r in 0..scan.radial_count() {
                        for g in 0..scan.gate_count() {
                            array[[s, r, g]] = scan.value_at(r, g);
                        }
                    }
                }
                Ok(array.into_dyn())
            }
            VariableRef::Scan(product, index) => {
                let (_, scan) = self.scan_of(product, index)?;
                let array = Array2::from_shape_fn((scan.radial_count(), scan.gate_count()), |(r, g)| {
                    scan.value_at(r, g)
                });
                Ok(array.into_dyn())
            }
            VariableRef::Coordinate(product, index, coord) => {
                let (_, scan) = self.scan_of(product, index)?;
                let values = match coord {
                    Coordinate::Azimuth => scan.azimuths(),
                    Coordinate::Elevation => scan.elevations(),
                    Coordinate::Distance => scan.range_axis(),
                };
                Ok(Array1::from_iter(values.iter().map(|&v| v as f32)).into_dyn())
            }
        }
    }

    /// Read a strided section of a variable.
    ///
    /// `origin`, `size` and `stride` give, per dimension, the first index,
    /// the number of elements and the step between them.
    pub fn read_section(
        &self,
        name: &str,
        origin: &[usize],
        size: &[usize],
        stride: &[usize],
    ) -> Result<ArrayD<f32>> {
        let full = self.read(name)?;
        let shape = full.shape().to_vec();
        if origin.len() != shape.len() || size.len() != shape.len() || stride.len() != shape.len() {
            return Err(RadarError::InvalidParameter {
                param: "origin/size/stride".to_string(),
                message: format!(
                    "{} has {} dimensions, got {}/{}/{}",
                    name,
                    shape.len(),
                    origin.len(),
                    size.len(),
                    stride.len()
                ),
            });
        }
        for axis in 0..shape.len() {
            if stride[axis] == 0 {
                return Err(RadarError::InvalidParameter {
                    param: "stride".to_string(),
                    message: format!("stride of dimension {} must be positive", axis),
                });
            }
            if origin[axis] > shape[axis] {
                return Err(RadarError::InvalidParameter {
                    param: "origin".to_string(),
                    message: format!(
                        "dimension {} starts at {} but has length {}",
                        axis, origin[axis], shape[axis]
                    ),
                });
            }
            if size[axis] == 0 {
                continue;
            }
            let last = (size[axis] - 1)
                .checked_mul(stride[axis])
                .and_then(|span| span.checked_add(origin[axis]))
                .filter(|&last| last < shape[axis]);
            if last.is_none() {
                return Err(RadarError::InvalidParameter {
                    param: "size".to_string(),
                    message: format!(
                        "dimension {} of length {} cannot hold {} elements from {} with stride {}",
                        axis, shape[axis], size[axis], origin[axis], stride[axis]
                    ),
                });
            }
        }

        let section = full.slice_each_axis(|ax| {
            let i = ax.axis.index();
            let start = origin[i] as isize;
            let end = if size[i] == 0 {
                start
            } else {
                (origin[i] + (size[i] - 1) * stride[i] + 1) as isize
            };
            Slice::new(start, Some(end), stride[i] as isize)
        });
        Ok(section.to_owned())
    }

    /// Volume-level attributes.
    pub fn global_attributes(&self) -> HashMap<String, AttributeValue> {
        let site = self.site();
        let task = self.task();
        let dims = self.dimensions();
        let mut attrs = HashMap::new();
        let mut text = |k: &str, v: &str| {
            attrs.insert(k.to_string(), AttributeValue::Text(v.to_string()));
        };
        text("format", &self.format().to_string());
        text("station_code", &site.station_code);
        text("station_name", &site.station_name);
        text("radar_type", &site.radar_type);
        text("task_name", &task.task_name);
        if let Some(start) = task.scan_start {
            text("scan_start_time", &start.to_rfc3339());
        }

        for (k, v) in [
            ("latitude", site.latitude),
            ("longitude", site.longitude),
            ("antenna_height", site.antenna_height),
            ("ground_height", site.ground_height),
            ("beam_width_vertical", site.beam_width_vertical),
            ("log_resolution", site.log_resolution),
            ("doppler_resolution", site.doppler_resolution),
            ("scan_count", dims.scan_count as f64),
            ("max_radial_count", dims.max_radial_count as f64),
        ] {
            attrs.insert(k.to_string(), AttributeValue::Number(v));
        }
        if let Some(scan_type) = task.scan_type {
            attrs.insert("scan_type".to_string(), AttributeValue::Number(scan_type as f64));
        }
        if !task.cut_elevations.is_empty() {
            attrs.insert(
                "cut_elevations".to_string(),
                AttributeValue::NumberArray(task.cut_elevations.clone()),
            );
        }
        attrs
    }

    fn product_attributes(record: &RadialRecord) -> HashMap<String, AttributeValue> {
        let mut attrs = HashMap::new();
        if let Some(info) = product::by_name(record.product()) {
            attrs.insert("long_name".to_string(), AttributeValue::Text(info.long_name.to_string()));
            attrs.insert("units".to_string(), AttributeValue::Text(info.units.to_string()));
        }
        if let Some(transform) = record.code_transform() {
            attrs.insert("scale_factor".to_string(), AttributeValue::Number(transform.scale));
            attrs.insert("add_offset".to_string(), AttributeValue::Number(transform.offset));
        }
        attrs
    }

    /// Every variable [`RadarVolume::read`] accepts, keyed by name.
    pub fn variables(&self) -> HashMap<String, Variable> {
        let mut variables = HashMap::new();
        for record in self.records() {
            let gate_dim = gate_dimension(record.channel()).to_string();

            let mut attrs = Self::product_attributes(record);
            attrs.insert(
                "fixed_elevations".to_string(),
                AttributeValue::NumberArray(record.fixed_elevations()),
            );
            attrs.insert(
                "radial_counts".to_string(),
                AttributeValue::NumberArray(
                    record.scans().iter().map(|s| s.radial_count() as f64).collect(),
                ),
            );
            attrs.insert(
                "gate_counts".to_string(),
                AttributeValue::NumberArray(
                    record.scans().iter().map(|s| s.gate_count() as f64).collect(),
                ),
            );
            variables.insert(
                record.product().to_string(),
                Variable {
                    name: record.product().to_string(),
                    dimensions: vec!["scan".to_string(), "radial".to_string(), gate_dim.clone()],
                    shape: vec![
                        record.scan_count(),
                        record.max_radial_count(),
                        record.max_gate_count(),
                    ],
                    attributes: attrs,
                    dtype: "f32".to_string(),
                },
            );

            for (i, scan) in record.scans().iter().enumerate() {
                let name = format!("{}_s{}", record.product(), i);
                let mut attrs = Self::product_attributes(record);
                attrs.insert(
                    "fixed_elevation".to_string(),
                    AttributeValue::Number(scan.fixed_elevation()),
                );
                attrs.insert("scan_index".to_string(), AttributeValue::Number(i as f64));
                variables.insert(
                    name.clone(),
                    Variable {
                        name: name.clone(),
                        dimensions: vec!["radial".to_string(), gate_dim.clone()],
                        shape: vec![scan.radial_count(), scan.gate_count()],
                        attributes: attrs,
                        dtype: "f32".to_string(),
                    },
                );

                for coord in [Coordinate::Azimuth, Coordinate::Elevation, Coordinate::Distance] {
                    let (dim, len, units) = match coord {
                        Coordinate::Distance => (gate_dim.clone(), scan.gate_count(), "m"),
                        _ => ("radial".to_string(), scan.radial_count(), "degree"),
                    };
                    let coord_name = format!("{}_{}", name, coord.suffix());
                    variables.insert(
                        coord_name.clone(),
                        Variable {
                            name: coord_name,
                            dimensions: vec![dim],
                            shape: vec![len],
                            attributes: HashMap::from([(
                                "units".to_string(),
                                AttributeValue::Text(units.to_string()),
                            )]),
                            dtype: "f32".to_string(),
                        },
                    );
                }
            }
        }
        variables
    }

    /// Attributes, dimensions and variables in one structure.
    pub fn metadata(&self) -> Metadata {
        let dims = self.dimensions();
        let dimensions = [
            ("scan", dims.scan_count),
            ("radial", dims.max_radial_count),
            ("gate_log", dims.log_gate_count),
            ("gate_doppler", dims.doppler_gate_count),
        ]
        .into_iter()
        .map(|(name, size)| {
            (
                name.to_string(),
                Dimension {
                    name: name.to_string(),
                    size,
                },
            )
        })
        .collect();

        Metadata {
            global_attributes: self.global_attributes(),
            dimensions,
            variables: self.variables(),
        }
    }
}
