//! Reader for the CMA standard base-data format.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::moment::{read_moments, CutGeometry, RadialPosition};
use super::{FormatReader, RadarFormat, ReaderOptions, ReaderState};
use crate::codec::standard::{
    CutConfig, GenericHeader, MomentHeader, RadialHeader, SiteConfig, TaskConfig, END_OF_VOLUME,
    RHI_SCAN_TYPES, STANDARD_MAGIC,
};
use crate::codec::{ByteCursor, Decode};
use crate::error::{RadarError, Result};
use crate::volume::{RadarVolume, SiteInfo, TaskInfo, VolumeBuilder};

#[derive(Debug, Clone, Default)]
pub struct StandardReader {
    options: ReaderOptions,
}

impl StandardReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    fn site_info(&self, site: &SiteConfig) -> SiteInfo {
        let beam_width = if site.beam_width_v > 0.0 {
            site.beam_width_v as f64
        } else {
            self.options.default_beam_width
        };
        SiteInfo {
            station_code: site.site_code.clone(),
            station_name: site.site_name.clone(),
            latitude: site.latitude as f64,
            longitude: site.longitude as f64,
            antenna_height: site.antenna_height as f64,
            ground_height: site.ground_height as f64,
            radar_type: site.radar_type.to_string(),
            beam_width_vertical: beam_width,
            ..SiteInfo::default()
        }
    }
}

fn task_info(task: &TaskConfig) -> TaskInfo {
    TaskInfo {
        task_name: task.task_name.clone(),
        scan_type: Some(task.scan_type),
        scan_start: DateTime::<Utc>::from_timestamp(task.scan_start_time as i64, 0),
        cut_elevations: Vec::new(),
    }
}

/// Cut geometry for a 1-based elevation number.
pub(super) fn declared_cut(cuts: &[CutGeometry], elevation_number: i32) -> Result<&CutGeometry> {
    usize::try_from(elevation_number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| cuts.get(i))
        .ok_or_else(|| {
            RadarError::scan_mode(format!(
                "radial references cut {} but {} cuts are declared",
                elevation_number,
                cuts.len()
            ))
        })
}

impl FormatReader for StandardReader {
    fn format(&self) -> RadarFormat {
        RadarFormat::Standard
    }

    fn read_volume(self, mut cursor: ByteCursor) -> Result<RadarVolume> {
        let generic = GenericHeader::decode(&mut cursor)?;
        if generic.magic != STANDARD_MAGIC {
            return Err(RadarError::UnsupportedFormat {
                message: format!("bad standard magic {:#010x}", generic.magic),
            });
        }
        debug!(
            major = generic.major_version,
            minor = generic.minor_version,
            generic_type = generic.generic_type,
            "Standard generic header"
        );

        let mut volume =
            VolumeBuilder::new(RadarFormat::Standard, SiteInfo::default(), TaskInfo::default());
        let mut cuts: Vec<CutGeometry> = Vec::new();
        let mut radials = 0usize;
        let mut state = ReaderState::ReadSiteHeader;

        while state != ReaderState::Done {
            state = match state {
                ReaderState::ReadSiteHeader => {
                    let site = SiteConfig::decode(&mut cursor)?;
                    *volume.site_mut() = self.site_info(&site);
                    ReaderState::ReadTaskHeader
                }
                ReaderState::ReadTaskHeader => {
                    let task = TaskConfig::decode(&mut cursor)?;
                    if RHI_SCAN_TYPES.contains(&task.scan_type) {
                        return Err(RadarError::scan_mode(format!(
                            "scan type {} is RHI",
                            task.scan_type
                        )));
                    }
                    let cut_number = usize::try_from(task.cut_number).map_err(|_| {
                        RadarError::scan_mode(format!("cut number {}", task.cut_number))
                    })?;
                    *volume.task_mut() = task_info(&task);
                    ReaderState::ReadCutConfigs(cut_number)
                }
                ReaderState::ReadCutConfigs(0) => {
                    volume.task_mut().cut_elevations = cuts.iter().map(|c| c.elevation).collect();
                    if let Some(first) = cuts.first() {
                        let site = volume.site_mut();
                        site.log_resolution = first.log_resolution;
                        site.doppler_resolution = first.doppler_resolution;
                    }
                    ReaderState::ReadRadial
                }
                ReaderState::ReadCutConfigs(remaining) => {
                    let cut = CutConfig::decode(&mut cursor)?;
                    cuts.push(CutGeometry::from(&cut));
                    ReaderState::ReadCutConfigs(remaining - 1)
                }
                ReaderState::ReadRadial if cursor.is_empty() => ReaderState::Done,
                ReaderState::ReadRadial => {
                    let radial = RadialHeader::decode(&mut cursor)?;
                    let cut = declared_cut(&cuts, radial.elevation_number)?;
                    let moments = usize::try_from(radial.moment_number).map_err(|_| {
                        RadarError::scan_mode(format!("moment number {}", radial.moment_number))
                    })?;
                    trace!(
                        radial = radial.radial_number,
                        cut = radial.elevation_number,
                        azimuth = radial.azimuth,
                        moments,
                        "Standard radial"
                    );
                    let position = RadialPosition {
                        cut_id: radial.elevation_number as usize,
                        azimuth: radial.azimuth as f64,
                        elevation: radial.elevation as f64,
                    };
                    read_moments::<MomentHeader>(&mut cursor, moments, position, cut, &mut volume)?;
                    radials += 1;
                    if radial.radial_state == END_OF_VOLUME {
                        ReaderState::Done
                    } else {
                        ReaderState::ReadRadial
                    }
                }
                ReaderState::ReadBeamConfigs(_) | ReaderState::Done => ReaderState::Done,
            };
        }

        debug!(
            radials,
            trailing = cursor.remaining(),
            products = volume.product_count(),
            "Standard volume read"
        );
        volume.finish()
    }
}
