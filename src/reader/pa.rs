//! Reader for phased-array base data.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::moment::{read_moments, CutGeometry, RadialPosition};
use super::standard::declared_cut;
use super::{FormatReader, RadarFormat, ReaderOptions, ReaderState};
use crate::codec::pa::{
    BeamConfig, CutConfig, GenericHeader, MomentHeader, RadialHeader, SiteConfig, TaskConfig,
    END_OF_VOLUME, PA_GENERIC_TYPE, RHI_SCAN_TYPES,
};
use crate::codec::{ByteCursor, Decode};
use crate::error::{RadarError, Result};
use crate::volume::{RadarVolume, SiteInfo, TaskInfo, VolumeBuilder};

#[derive(Debug, Clone, Default)]
pub struct PaReader {
    options: ReaderOptions,
}

impl PaReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

fn site_info(site: &SiteConfig, beam_width: f64) -> SiteInfo {
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

fn count(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| RadarError::scan_mode(format!("{} {}", what, value)))
}

impl FormatReader for PaReader {
    fn format(&self) -> RadarFormat {
        RadarFormat::Pa
    }

    fn read_volume(self, mut cursor: ByteCursor) -> Result<RadarVolume> {
        let generic = GenericHeader::decode(&mut cursor)?;
        if generic.generic_type != PA_GENERIC_TYPE {
            return Err(RadarError::UnsupportedFormat {
                message: format!("generic type {} is not phased array", generic.generic_type),
            });
        }

        let mut volume = VolumeBuilder::new(RadarFormat::Pa, SiteInfo::default(), TaskInfo::default());
        let mut site: Option<SiteConfig> = None;
        let mut cut_number = 0usize;
        let mut beam_width: Option<f64> = None;
        let mut cuts: Vec<CutGeometry> = Vec::new();
        let mut radials = 0usize;
        let mut state = ReaderState::ReadSiteHeader;

        while state != ReaderState::Done {
            state = match state {
                ReaderState::ReadSiteHeader => {
                    let config = SiteConfig::decode(&mut cursor)?;
                    debug!(
                        antenna_type = config.antenna_type,
                        tr_number = config.tr_number,
                        "Phased-array site"
                    );
                    site = Some(config);
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
                    cut_number = count(task.cut_number, "cut number")?;
                    *volume.task_mut() = TaskInfo {
                        task_name: task.task_name.clone(),
                        scan_type: Some(task.scan_type),
                        scan_start: DateTime::<Utc>::from_timestamp(task.scan_start_time, 0),
                        cut_elevations: Vec::new(),
                    };
                    ReaderState::ReadBeamConfigs(count(task.beam_number, "beam number")?)
                }
                ReaderState::ReadBeamConfigs(0) => ReaderState::ReadCutConfigs(cut_number),
                ReaderState::ReadBeamConfigs(remaining) => {
                    let beam = BeamConfig::decode(&mut cursor)?;
                    if beam_width.is_none() && beam.rx_beam_width_v > 0.0 {
                        beam_width = Some(beam.rx_beam_width_v as f64);
                    }
                    ReaderState::ReadBeamConfigs(remaining - 1)
                }
                ReaderState::ReadCutConfigs(0) => {
                    if let Some(config) = &site {
                        *volume.site_mut() = site_info(
                            config,
                            beam_width.unwrap_or(self.options.default_beam_width),
                        );
                    }
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
                    let moments = count(radial.moment_number, "moment number")?;
                    trace!(
                        radial = radial.radial_number,
                        cut = radial.elevation_number,
                        beam = radial.scan_beam_index,
                        azimuth = radial.azimuth,
                        "Phased-array radial"
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
                ReaderState::Done => ReaderState::Done,
            };
        }

        debug!(
            radials,
            trailing = cursor.remaining(),
            products = volume.product_count(),
            "Phased-array volume read"
        );
        volume.finish()
    }
}
