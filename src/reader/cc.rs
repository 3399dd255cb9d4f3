//! Reader for CINRAD/CC base data.

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use tracing::debug;

use super::{FormatReader, RadarFormat, ReaderOptions, ReaderState};
use crate::codec::cc::{
    shift_code, Header, LayerParam, RadialHeader, BLOCK_SIZE, GATES_PER_BLOCK, HAS_REFLECTIVITY,
    HAS_SPECTRUM_WIDTH, HAS_VELOCITY, PROCESS_FFT_ONLY,
};
use crate::codec::cursor::u16_codes;
use crate::codec::{ByteCursor, Decode};
use crate::error::{RadarError, Result};
use crate::product::{REFLECTIVITY, SPECTRUM_WIDTH, VELOCITY};
use crate::record::{CodeTransform, RawGates};
use crate::volume::{RadarVolume, SiteInfo, TaskInfo, VolumeBuilder};

/// Values are tenths of the physical unit, shifted into `u16`.
pub fn cc_transform() -> CodeTransform {
    CodeTransform::direct(0.1, -3276.8, 1)
}

#[derive(Debug, Clone, Default)]
pub struct CcReader {
    options: ReaderOptions,
}

impl CcReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    fn site_info(&self, header: &Header) -> SiteInfo {
        let beam_width = if header.beam_width_v > 0 {
            header.beam_width_v as f64 / 100.0
        } else {
            self.options.default_beam_width
        };
        let first = &header.layers[0];
        SiteInfo {
            station_code: header.station_number.clone(),
            station_name: header.station.clone(),
            latitude: header.latitude as f64 / 1000.0,
            longitude: header.longitude as f64 / 1000.0,
            antenna_height: header.height as f64 / 1000.0,
            ground_height: 0.0,
            radar_type: "CC".to_string(),
            beam_width_vertical: beam_width,
            log_resolution: first.bin_width as f64,
            doppler_resolution: first.bin_width as f64,
        }
    }
}

fn task_info(header: &Header, layers: &[LayerParam]) -> TaskInfo {
    TaskInfo {
        task_name: format!("scan mode {}", header.scan_mode),
        scan_type: Some(header.scan_mode as i32),
        scan_start: header
            .start
            .to_datetime()
            .map(|naive| Utc.from_utc_datetime(&naive)),
        cut_elevations: layers.iter().map(LayerParam::elevation).collect(),
    }
}

/// Gate centres `(i + 1) * bin_width`.
fn layer_axis(layer: &LayerParam, gates: usize) -> Vec<f64> {
    (0..gates)
        .map(|i| (i + 1) as f64 * layer.bin_width as f64)
        .collect()
}

/// Codes of one 500-gate block, `None` when the flag is clear.
fn block_codes(body: &mut Bytes, present: bool, gates: usize) -> Option<Vec<u16>> {
    let mut block = body.split_to(BLOCK_SIZE);
    if !present {
        return None;
    }
    let codes = u16_codes(&mut block, gates)
        .into_iter()
        .map(|c| shift_code(c as i16))
        .collect();
    Some(codes)
}

impl FormatReader for CcReader {
    fn format(&self) -> RadarFormat {
        RadarFormat::Cc
    }

    fn read_volume(self, mut cursor: ByteCursor) -> Result<RadarVolume> {
        let header = Header::decode(&mut cursor)?;
        let layer_count = header.layer_count().ok_or_else(|| {
            RadarError::scan_mode(format!("CC scan mode {} is not a PPI volume", header.scan_mode))
        })?;
        if header.process_type == PROCESS_FFT_ONLY {
            return Err(RadarError::scan_mode("CC FFT-only processing"));
        }
        let layers = &header.layers[..layer_count];
        for (i, layer) in layers.iter().enumerate() {
            if layer.bin_number as usize > GATES_PER_BLOCK {
                return Err(RadarError::TruncatedRecord {
                    record: "cc radial block",
                    offset: Header::SIZE,
                    needed: layer.bin_number as usize * 2,
                    available: BLOCK_SIZE,
                });
            }
            debug!(
                layer = i,
                elevation = layer.elevation(),
                gates = layer.bin_number,
                bin_width = layer.bin_width,
                "CC layer"
            );
        }

        let mut volume = VolumeBuilder::new(
            RadarFormat::Cc,
            self.site_info(&header),
            task_info(&header, layers),
        );

        let data_offset = header.data_offset as usize;
        if data_offset > cursor.position() {
            cursor.skip(data_offset - cursor.position(), "cc header padding")?;
        }

        let mut layer: Option<usize> = None;
        let mut radials = 0usize;
        let mut state = ReaderState::ReadRadial;

        while state != ReaderState::Done {
            if cursor.is_empty() {
                state = ReaderState::Done;
                continue;
            }
            let radial = RadialHeader::decode(&mut cursor)?;
            let mut body = cursor.take(3 * BLOCK_SIZE, "cc radial body")?;

            if radial.radial_number == 1 || layer.is_none() {
                layer = Some(layer.map_or(0, |l| l + 1));
            }
            let index = layer.unwrap_or(0);
            let param = layers.get(index).ok_or_else(|| {
                RadarError::scan_mode(format!(
                    "radial opens layer {} but {} layers are declared",
                    index + 1,
                    layer_count
                ))
            })?;

            let gates = param.bin_number as usize;
            let reflectivity = block_codes(&mut body, radial.flags & HAS_REFLECTIVITY != 0, gates);
            let velocity = block_codes(&mut body, radial.flags & HAS_VELOCITY != 0, gates);
            let spectrum_width =
                block_codes(&mut body, radial.flags & HAS_SPECTRUM_WIDTH != 0, gates);

            for (product, codes) in [
                (REFLECTIVITY, reflectivity),
                (VELOCITY, velocity),
                (SPECTRUM_WIDTH, spectrum_width),
            ] {
                let Some(codes) = codes else { continue };
                let record = volume.record_mut(product);
                if record.needs_scan(index) {
                    record.begin_scan(
                        index,
                        Some(param.elevation()),
                        layer_axis(param, gates),
                        cc_transform(),
                    );
                }
                record.push_radial(radial.azimuth(), radial.elevation(), RawGates::U16(codes))?;
            }
            radials += 1;
        }

        debug!(radials, layers = layer_count, "CC volume read");
        volume.finish()
    }
}
