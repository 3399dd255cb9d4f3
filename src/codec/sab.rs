//! Fixed-layout radial records of the CINRAD/SA and SB base-data format.
//!
//! Every radial is a 2432-byte record: a 128-byte header followed by the
//! reflectivity, velocity and spectrum-width blocks and a 4-byte trailer.

use bytes::{Buf, Bytes};

use super::cursor::Decode;

pub const RADIAL_SIZE: usize = 2432;
pub const REFLECTIVITY_BLOCK: usize = 460;
pub const VELOCITY_BLOCK: usize = 920;
pub const SPECTRUM_WIDTH_BLOCK: usize = 920;
pub const TRAILER: usize = 4;

/// Message type of a digital radial data record.
pub const RADIAL_MESSAGE: u16 = 1;

/// Codes below this value are below threshold (0) or range folded (1).
pub const NO_DATA_BELOW: u16 = 2;

#[derive(Debug, Clone)]
pub struct RadialHeader {
    pub message_type: u16,
    /// Milliseconds since midnight UTC
    pub collect_time_ms: u32,
    /// Days since 1969-12-31, 1 = 1970-01-01
    pub julian_date: u16,
    /// Unambiguous range in 0.1 km
    pub unambiguous_range: u16,
    pub azimuth_code: u16,
    pub radial_number: u16,
    pub radial_status: u16,
    pub elevation_code: u16,
    pub elevation_number: u16,
    pub first_gate_ref: i16,
    pub first_gate_dop: i16,
    pub gate_size_ref: u16,
    pub gate_size_dop: u16,
    pub gate_count_ref: u16,
    pub gate_count_dop: u16,
    pub cut_sector: u16,
    pub calibration: u32,
    pub ref_pointer: u16,
    pub vel_pointer: u16,
    pub sw_pointer: u16,
    /// 2 = 0.5 m/s, 4 = 1 m/s
    pub velocity_resolution: u16,
    pub vcp: u16,
    pub ref_pointer_playback: u16,
    pub vel_pointer_playback: u16,
    pub sw_pointer_playback: u16,
    /// Nyquist velocity in 0.01 m/s
    pub nyquist_velocity: u16,
}

impl RadialHeader {
    pub fn azimuth(&self) -> f64 {
        angle_from_code(self.azimuth_code)
    }

    pub fn elevation(&self) -> f64 {
        angle_from_code(self.elevation_code)
    }

    pub fn has_reflectivity(&self) -> bool {
        self.gate_count_ref > 0
    }

    pub fn has_doppler(&self) -> bool {
        self.gate_count_dop > 0
    }
}

/// Angle codes are 1/8 of a 4096th of 180 degrees.
pub fn angle_from_code(code: u16) -> f64 {
    code as f64 / 8.0 * 180.0 / 4096.0
}

impl Decode for RadialHeader {
    const SIZE: usize = 128;
    const NAME: &'static str = "sab radial header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        buf.advance(14);
        let message_type = buf.get_u16_le();
        buf.advance(12);
        let collect_time_ms = buf.get_u32_le();
        let julian_date = buf.get_u16_le();
        let unambiguous_range = buf.get_u16_le();
        let azimuth_code = buf.get_u16_le();
        let radial_number = buf.get_u16_le();
        let radial_status = buf.get_u16_le();
        let elevation_code = buf.get_u16_le();
        let elevation_number = buf.get_u16_le();
        let first_gate_ref = buf.get_i16_le();
        let first_gate_dop = buf.get_i16_le();
        let gate_size_ref = buf.get_u16_le();
        let gate_size_dop = buf.get_u16_le();
        let gate_count_ref = buf.get_u16_le();
        let gate_count_dop = buf.get_u16_le();
        let cut_sector = buf.get_u16_le();
        let calibration = buf.get_u32_le();
        let ref_pointer = buf.get_u16_le();
        let vel_pointer = buf.get_u16_le();
        let sw_pointer = buf.get_u16_le();
        let velocity_resolution = buf.get_u16_le();
        let vcp = buf.get_u16_le();
        buf.advance(8);
        let ref_pointer_playback = buf.get_u16_le();
        let vel_pointer_playback = buf.get_u16_le();
        let sw_pointer_playback = buf.get_u16_le();
        let nyquist_velocity = buf.get_u16_le();
        buf.advance(38);
        Self {
            message_type,
            collect_time_ms,
            julian_date,
            unambiguous_range,
            azimuth_code,
            radial_number,
            radial_status,
            elevation_code,
            elevation_number,
            first_gate_ref,
            first_gate_dop,
            gate_size_ref,
            gate_size_dop,
            gate_count_ref,
            gate_count_dop,
            cut_sector,
            calibration,
            ref_pointer,
            vel_pointer,
            sw_pointer,
            velocity_resolution,
            vcp,
            ref_pointer_playback,
            vel_pointer_playback,
            sw_pointer_playback,
            nyquist_velocity,
        }
    }
}
