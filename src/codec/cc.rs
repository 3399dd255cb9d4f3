//! Header and radial records of the CINRAD/CC base-data format.
//!
//! A single 1024-byte header carries the site, the task and up to thirty
//! layer (cut) parameter blocks. Radials follow as fixed 3008-byte records
//! with three 500-gate blocks of signed tenths.

use bytes::{Buf, Bytes};
use chrono::{NaiveDate, NaiveDateTime};

use super::cursor::{fixed_text, Decode};

pub const MAX_LAYERS: usize = 30;
pub const GATES_PER_BLOCK: usize = 500;
pub const BLOCK_SIZE: usize = GATES_PER_BLOCK * 2;
pub const RADIAL_SIZE: usize = RadialHeader::SIZE + 3 * BLOCK_SIZE;

/// Scan mode codes
pub const SCAN_MODE_RHI: u8 = 1;
pub const SCAN_MODE_PPI: u8 = 10;
pub const SCAN_MODE_VOLUME_BASE: u8 = 100;

/// Process type of a header that only carries FFT spectra.
pub const PROCESS_FFT_ONLY: u16 = 2;

/// Signed no-data code
pub const NO_DATA: i16 = i16::MIN;

/// Shift from signed tenths to the unsigned code space used by records.
pub const CODE_SHIFT: i32 = 32768;

#[derive(Debug, Clone)]
pub struct LayerParam {
    pub data_type: u8,
    pub ambiguous: u8,
    pub speed: u16,
    pub prf1: u16,
    pub prf2: u16,
    pub pulse_width: u16,
    /// cm/s
    pub max_velocity: u16,
    /// 10 m
    pub max_range: u16,
    /// metres
    pub bin_width: u16,
    pub bin_number: u16,
    pub record_number: u16,
    /// 0.01 degree
    pub sweep_angle: i16,
}

impl LayerParam {
    pub const SIZE: usize = 22;

    fn read(buf: &mut Bytes) -> Self {
        Self {
            data_type: buf.get_u8(),
            ambiguous: buf.get_u8(),
            speed: buf.get_u16_le(),
            prf1: buf.get_u16_le(),
            prf2: buf.get_u16_le(),
            pulse_width: buf.get_u16_le(),
            max_velocity: buf.get_u16_le(),
            max_range: buf.get_u16_le(),
            bin_width: buf.get_u16_le(),
            bin_number: buf.get_u16_le(),
            record_number: buf.get_u16_le(),
            sweep_angle: buf.get_i16_le(),
        }
    }

    pub fn elevation(&self) -> f64 {
        self.sweep_angle as f64 / 100.0
    }
}

/// Seven-byte calendar stamp with a split century.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stamp {
    pub year_hi: u8,
    pub year_lo: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Stamp {
    fn read(buf: &mut Bytes) -> Self {
        Self {
            year_hi: buf.get_u8(),
            year_lo: buf.get_u8(),
            month: buf.get_u8(),
            day: buf.get_u8(),
            hour: buf.get_u8(),
            minute: buf.get_u8(),
            second: buf.get_u8(),
        }
    }

    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        let year = self.year_hi as i32 * 100 + self.year_lo as i32;
        NaiveDate::from_ymd_opt(year, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub file_type: String,
    pub country: String,
    pub province: String,
    pub station: String,
    pub station_number: String,
    pub radar_type: String,
    pub longitude_text: String,
    pub latitude_text: String,
    /// 0.001 degree
    pub longitude: i32,
    /// 0.001 degree
    pub latitude: i32,
    /// millimetres
    pub height: i32,
    pub max_angle: i16,
    pub opt_angle: i16,
    pub start: Stamp,
    pub time_from: u8,
    pub end: Stamp,
    pub scan_mode: u8,
    pub start_millisecond: u32,
    pub rhi_azimuth: u16,
    pub rhi_low: i16,
    pub rhi_high: i16,
    pub echo_type: u16,
    pub product_code: u16,
    pub calibration: u8,
    pub layers: Vec<LayerParam>,
    pub antenna_gain: i32,
    pub power: i32,
    pub wavelength: i32,
    /// 0.01 degree
    pub beam_width_h: u16,
    /// 0.01 degree
    pub beam_width_v: u16,
    pub polarization: u16,
    pub log_a: u16,
    pub line_a: u16,
    pub agcp: u16,
    pub freq_mode: u16,
    pub freq_repeat: u16,
    pub ppp_pulse: u16,
    pub fft_point: u16,
    pub process_type: u16,
    pub thresholds: [u8; 13],
    pub data_offset: u32,
}

impl Header {
    /// Number of layers the scan mode declares, `None` for unsupported modes.
    pub fn layer_count(&self) -> Option<usize> {
        match self.scan_mode {
            SCAN_MODE_PPI => Some(1),
            mode if mode > SCAN_MODE_VOLUME_BASE => {
                Some((mode - SCAN_MODE_VOLUME_BASE) as usize).filter(|&n| n <= MAX_LAYERS)
            }
            _ => None,
        }
    }
}

impl Decode for Header {
    const SIZE: usize = 1024;
    const NAME: &'static str = "cc header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let file_type = fixed_text(buf, 16);
        let country = fixed_text(buf, 30);
        let province = fixed_text(buf, 20);
        let station = fixed_text(buf, 40);
        let station_number = fixed_text(buf, 10);
        let radar_type = fixed_text(buf, 20);
        let longitude_text = fixed_text(buf, 16);
        let latitude_text = fixed_text(buf, 16);
        let longitude = buf.get_i32_le();
        let latitude = buf.get_i32_le();
        let height = buf.get_i32_le();
        let max_angle = buf.get_i16_le();
        let opt_angle = buf.get_i16_le();
        let start = Stamp::read(buf);
        let time_from = buf.get_u8();
        let end = Stamp::read(buf);
        let scan_mode = buf.get_u8();
        let start_millisecond = buf.get_u32_le();
        let rhi_azimuth = buf.get_u16_le();
        let rhi_low = buf.get_i16_le();
        let rhi_high = buf.get_i16_le();
        let echo_type = buf.get_u16_le();
        let product_code = buf.get_u16_le();
        let calibration = buf.get_u8();
        buf.advance(3);
        let layers = (0..MAX_LAYERS).map(|_| LayerParam::read(buf)).collect();
        let antenna_gain = buf.get_i32_le();
        let power = buf.get_i32_le();
        let wavelength = buf.get_i32_le();
        let beam_width_h = buf.get_u16_le();
        let beam_width_v = buf.get_u16_le();
        let polarization = buf.get_u16_le();
        let log_a = buf.get_u16_le();
        let line_a = buf.get_u16_le();
        let agcp = buf.get_u16_le();
        let freq_mode = buf.get_u16_le();
        let freq_repeat = buf.get_u16_le();
        let ppp_pulse = buf.get_u16_le();
        let fft_point = buf.get_u16_le();
        let process_type = buf.get_u16_le();
        let thresholds = std::array::from_fn(|_| buf.get_u8());
        buf.advance(92);
        let data_offset = buf.get_u32_le();
        buf.advance(3);
        Self {
            file_type,
            country,
            province,
            station,
            station_number,
            radar_type,
            longitude_text,
            latitude_text,
            longitude,
            latitude,
            height,
            max_angle,
            opt_angle,
            start,
            time_from,
            end,
            scan_mode,
            start_millisecond,
            rhi_azimuth,
            rhi_low,
            rhi_high,
            echo_type,
            product_code,
            calibration,
            layers,
            antenna_gain,
            power,
            wavelength,
            beam_width_h,
            beam_width_v,
            polarization,
            log_a,
            line_a,
            agcp,
            freq_mode,
            freq_repeat,
            ppp_pulse,
            fft_point,
            process_type,
            thresholds,
            data_offset,
        }
    }
}

/// Presence flags on a radial
pub const HAS_REFLECTIVITY: u8 = 0b001;
pub const HAS_VELOCITY: u8 = 0b010;
pub const HAS_SPECTRUM_WIDTH: u8 = 0b100;

#[derive(Debug, Clone)]
pub struct RadialHeader {
    /// 1-based within the layer
    pub radial_number: u16,
    /// 0.01 degree
    pub azimuth: u16,
    /// 0.01 degree
    pub elevation: i16,
    pub flags: u8,
}

impl RadialHeader {
    pub fn azimuth(&self) -> f64 {
        self.azimuth as f64 / 100.0
    }

    pub fn elevation(&self) -> f64 {
        self.elevation as f64 / 100.0
    }
}

impl Decode for RadialHeader {
    const SIZE: usize = 8;
    const NAME: &'static str = "cc radial header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let radial = Self {
            radial_number: buf.get_u16_le(),
            azimuth: buf.get_u16_le(),
            elevation: buf.get_i16_le(),
            flags: buf.get_u8(),
        };
        buf.advance(1);
        radial
    }
}

/// Map a signed tenth to the unsigned code space, 0 being no data.
pub fn shift_code(value: i16) -> u16 {
    (value as i32 + CODE_SHIFT) as u16
}
