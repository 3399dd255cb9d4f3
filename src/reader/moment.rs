//! Moment blocks shared by the standard and phased-array readers.

use bytes::Bytes;

use crate::codec::cursor::u16_codes;
use crate::codec::{pa, standard, ByteCursor, Decode};
use crate::error::{RadarError, Result};
use crate::product::{self, Channel};
use crate::record::{CodeTransform, RawGates};
use crate::volume::VolumeBuilder;

/// Codes 0 to 4 are reserved for below-threshold and folded gates.
pub const NO_DATA_BELOW: u16 = 5;

/// Range geometry of one declared cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CutGeometry {
    pub elevation: f64,
    pub start_range: f64,
    pub log_resolution: f64,
    pub doppler_resolution: f64,
}

impl CutGeometry {
    /// Gate centres `start_range + (i + 1) * resolution`.
    pub fn range_axis(&self, channel: Channel, gates: usize) -> Vec<f64> {
        let resolution = match channel {
            Channel::Log => self.log_resolution,
            Channel::Doppler => self.doppler_resolution,
        };
        (0..gates)
            .map(|i| self.start_range + (i + 1) as f64 * resolution)
            .collect()
    }
}

impl From<&standard::CutConfig> for CutGeometry {
    fn from(cut: &standard::CutConfig) -> Self {
        Self {
            elevation: cut.elevation as f64,
            start_range: cut.start_range as f64,
            log_resolution: cut.log_resolution as f64,
            doppler_resolution: cut.doppler_resolution as f64,
        }
    }
}

impl From<&pa::CutConfig> for CutGeometry {
    fn from(cut: &pa::CutConfig) -> Self {
        Self {
            elevation: cut.elevation as f64,
            start_range: cut.start_range as f64,
            log_resolution: cut.log_resolution as f64,
            doppler_resolution: cut.doppler_resolution as f64,
        }
    }
}

/// The moment header fields both formats share.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MomentBlock {
    pub data_type: i32,
    pub scale: i32,
    pub offset: i32,
    pub bin_length: i16,
    pub length: i32,
}

impl From<standard::MomentHeader> for MomentBlock {
    fn from(m: standard::MomentHeader) -> Self {
        Self {
            data_type: m.data_type,
            scale: m.scale,
            offset: m.offset,
            bin_length: m.bin_length,
            length: m.length,
        }
    }
}

impl From<pa::MomentHeader> for MomentBlock {
    fn from(m: pa::MomentHeader) -> Self {
        Self {
            data_type: m.data_type,
            scale: m.scale,
            offset: m.offset,
            bin_length: m.bin_length,
            length: m.length,
        }
    }
}

/// Where a radial sits in the volume.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RadialPosition {
    pub cut_id: usize,
    pub azimuth: f64,
    pub elevation: f64,
}

fn gates_from(block: &MomentBlock, mut payload: Bytes) -> Result<RawGates> {
    match block.bin_length {
        1 => Ok(RawGates::U8(payload.to_vec())),
        2 => {
            let count = payload.len() / 2;
            Ok(RawGates::U16(u16_codes(&mut payload, count)))
        }
        n => Err(RadarError::scan_mode(format!(
            "moment type {} has bin length {}",
            block.data_type, n
        ))),
    }
}

/// Read `count` moments of one radial into the volume.
pub(crate) fn read_moments<H>(
    cursor: &mut ByteCursor,
    count: usize,
    position: RadialPosition,
    cut: &CutGeometry,
    volume: &mut VolumeBuilder,
) -> Result<()>
where
    H: Decode + Into<MomentBlock>,
{
    for _ in 0..count {
        let block: MomentBlock = H::decode(cursor)?.into();
        let length = usize::try_from(block.length).map_err(|_| {
            RadarError::scan_mode(format!(
                "moment type {} declares length {}",
                block.data_type, block.length
            ))
        })?;
        let payload = cursor.take(length, "moment data")?;

        let info = product::by_code(block.data_type).ok_or_else(|| {
            RadarError::scan_mode(format!("unknown moment data type {}", block.data_type))
        })?;
        if block.scale == 0 {
            return Err(RadarError::scan_mode(format!(
                "moment {} has zero scale",
                info.name
            )));
        }
        let gates = gates_from(&block, payload)?;

        let record = volume.record_mut(info.name);
        if record.needs_scan(position.cut_id) {
            record.begin_scan(
                position.cut_id,
                Some(cut.elevation),
                cut.range_axis(info.channel, gates.len()),
                CodeTransform::inverse(block.scale as f64, block.offset as f64, NO_DATA_BELOW),
            );
        }
        record.push_radial(position.azimuth, position.elevation, gates)?;
    }
    Ok(())
}
