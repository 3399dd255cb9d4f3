//! Reader for CINRAD/SA and SB base data.
//!
//! SAB files are a flat sequence of fixed 2432-byte radials with no volume
//! header. A radial numbered 1 opens a new cut.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{FormatReader, RadarFormat, ReaderOptions, ReaderState};
use crate::codec::sab::{
    RadialHeader, NO_DATA_BELOW, RADIAL_MESSAGE, RADIAL_SIZE, REFLECTIVITY_BLOCK,
    SPECTRUM_WIDTH_BLOCK, TRAILER, VELOCITY_BLOCK,
};
use crate::codec::{ByteCursor, Decode};
use crate::error::{RadarError, Result};
use crate::product::{REFLECTIVITY, SPECTRUM_WIDTH, VELOCITY};
use crate::record::{range_axis, CodeTransform, RawGates};
use crate::volume::{RadarVolume, SiteInfo, TaskInfo, VolumeBuilder};

const BODY_SIZE: usize = RADIAL_SIZE - RadialHeader::SIZE;

#[derive(Debug, Clone, Default)]
pub struct SabReader {
    options: ReaderOptions,
}

impl SabReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

pub fn reflectivity_transform() -> CodeTransform {
    CodeTransform::direct(0.5, -33.0, NO_DATA_BELOW)
}

/// Velocity codes are 0.5 m/s apart at resolution 2 and 1 m/s at 4.
pub fn velocity_transform(resolution: u16) -> CodeTransform {
    match resolution {
        4 => CodeTransform::direct(1.0, -129.0, NO_DATA_BELOW),
        _ => CodeTransform::direct(0.5, -64.5, NO_DATA_BELOW),
    }
}

pub fn spectrum_width_transform() -> CodeTransform {
    CodeTransform::direct(0.5, -64.5, NO_DATA_BELOW)
}

/// Collection time of a radial.
fn collect_time(header: &RadialHeader) -> Option<DateTime<Utc>> {
    let days = header.julian_date as i64 - 1;
    let millis = days * 86_400_000 + header.collect_time_ms as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Split one product's block off the body and keep its first `gates` codes.
fn block_gates(
    body: &mut Bytes,
    block: usize,
    gates: u16,
    present: bool,
    record: &'static str,
    offset: usize,
) -> Result<Option<Vec<u8>>> {
    let data = body.split_to(block);
    if !present {
        return Ok(None);
    }
    let gates = gates as usize;
    if gates > block {
        return Err(RadarError::TruncatedRecord {
            record,
            offset,
            needed: gates,
            available: block,
        });
    }
    Ok(Some(data[..gates].to_vec()))
}

impl FormatReader for SabReader {
    fn format(&self) -> RadarFormat {
        RadarFormat::Sab
    }

    fn read_volume(self, mut cursor: ByteCursor) -> Result<RadarVolume> {
        let site = SiteInfo {
            radar_type: "SA".to_string(),
            beam_width_vertical: self.options.default_beam_width,
            ..SiteInfo::default()
        };
        let mut volume = VolumeBuilder::new(RadarFormat::Sab, site, TaskInfo::default());
        let mut cut_id = 0usize;
        let mut radials = 0usize;
        let mut skipped = 0usize;
        let mut state = ReaderState::ReadRadial;

        while state != ReaderState::Done {
            if cursor.is_empty() {
                state = ReaderState::Done;
                continue;
            }
            let start = cursor.position();
            let header = RadialHeader::decode(&mut cursor)?;
            let mut body = cursor.take(BODY_SIZE, "sab radial body")?;
            if header.message_type != RADIAL_MESSAGE {
                skipped += 1;
                continue;
            }

            if header.radial_number == 1 {
                cut_id += 1;
            }
            if radials == 0 {
                let site = volume.site_mut();
                site.log_resolution = header.gate_size_ref as f64;
                site.doppler_resolution = header.gate_size_dop as f64;
                let task = volume.task_mut();
                task.task_name = format!("VCP{}", header.vcp);
                task.scan_type = Some(header.vcp as i32);
                task.scan_start = collect_time(&header);
            }

            let body_start = start + RadialHeader::SIZE;
            let reflectivity = block_gates(
                &mut body,
                REFLECTIVITY_BLOCK,
                header.gate_count_ref,
                header.has_reflectivity(),
                "sab reflectivity block",
                body_start,
            )?;
            let velocity = block_gates(
                &mut body,
                VELOCITY_BLOCK,
                header.gate_count_dop,
                header.has_doppler(),
                "sab velocity block",
                body_start + REFLECTIVITY_BLOCK,
            )?;
            let spectrum_width = block_gates(
                &mut body,
                SPECTRUM_WIDTH_BLOCK,
                header.gate_count_dop,
                header.has_doppler(),
                "sab spectrum width block",
                body_start + REFLECTIVITY_BLOCK + VELOCITY_BLOCK,
            )?;
            debug_assert_eq!(body.len(), TRAILER);

            let azimuth = header.azimuth();
            let elevation = header.elevation();
            let log_axis = range_axis(
                header.first_gate_ref as f64,
                header.gate_size_ref as f64,
                header.gate_count_ref as usize,
            );
            let doppler_axis = range_axis(
                header.first_gate_dop as f64,
                header.gate_size_dop as f64,
                header.gate_count_dop as usize,
            );

            for (product, codes, axis, transform) in [
                (REFLECTIVITY, reflectivity, log_axis, reflectivity_transform()),
                (
                    VELOCITY,
                    velocity,
                    doppler_axis.clone(),
                    velocity_transform(header.velocity_resolution),
                ),
                (SPECTRUM_WIDTH, spectrum_width, doppler_axis, spectrum_width_transform()),
            ] {
                let Some(codes) = codes else { continue };
                let record = volume.record_mut(product);
                if record.needs_scan(cut_id) {
                    record.begin_scan(cut_id, None, axis, transform);
                }
                record.push_radial(azimuth, elevation, RawGates::U8(codes))?;
            }
            radials += 1;
        }

        if skipped > 0 {
            warn!(skipped, "Skipped non-radial SAB records");
        }
        debug!(radials, cuts = cut_id, "SAB volume read");
        volume.finish()
    }
}
