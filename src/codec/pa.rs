//! Header records of the phased-array base-data format.
//!
//! The layout follows the same generic/site/task/cut/radial/moment shape as
//! the standard format, but widths and field orders differ and beam
//! configurations sit between the task and the cuts.

use bytes::{Buf, Bytes};

use super::cursor::{fixed_text, Decode};

/// Generic type value that identifies phased-array base data.
pub const PA_GENERIC_TYPE: i32 = 16;

pub const RHI_SCAN_TYPES: [i32; 2] = [2, 5];

pub const END_OF_VOLUME: i32 = 4;

#[derive(Debug, Clone)]
pub struct GenericHeader {
    pub magic: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub generic_type: i32,
    pub product_type: i32,
}

impl Decode for GenericHeader {
    const SIZE: usize = 32;
    const NAME: &'static str = "pa generic header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let header = Self {
            magic: buf.get_u32_le(),
            major_version: buf.get_u16_le(),
            minor_version: buf.get_u16_le(),
            generic_type: buf.get_i32_le(),
            product_type: buf.get_i32_le(),
        };
        buf.advance(16);
        header
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_code: String,
    pub site_name: String,
    pub latitude: f32,
    pub longitude: f32,
    pub antenna_height: i32,
    pub ground_height: i32,
    pub frequency: f32,
    pub antenna_type: i32,
    pub tr_number: i32,
    pub rda_version: i32,
    pub radar_type: i16,
}

impl Decode for SiteConfig {
    const SIZE: usize = 128;
    const NAME: &'static str = "pa site config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let site = Self {
            site_code: fixed_text(buf, 8),
            site_name: fixed_text(buf, 32),
            latitude: buf.get_f32_le(),
            longitude: buf.get_f32_le(),
            antenna_height: buf.get_i32_le(),
            ground_height: buf.get_i32_le(),
            frequency: buf.get_f32_le(),
            antenna_type: buf.get_i32_le(),
            tr_number: buf.get_i32_le(),
            rda_version: buf.get_i32_le(),
            radar_type: buf.get_i16_le(),
        };
        buf.advance(54);
        site
    }
}

#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub task_name: String,
    pub task_description: String,
    pub polarization_type: i32,
    pub scan_type: i32,
    pub beam_number: i32,
    pub cut_number: i32,
    pub ray_order: i32,
    /// Seconds since the unix epoch
    pub scan_start_time: i64,
}

impl Decode for TaskConfig {
    const SIZE: usize = 256;
    const NAME: &'static str = "pa task config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let task = Self {
            task_name: fixed_text(buf, 32),
            task_description: fixed_text(buf, 128),
            polarization_type: buf.get_i32_le(),
            scan_type: buf.get_i32_le(),
            beam_number: buf.get_i32_le(),
            cut_number: buf.get_i32_le(),
            ray_order: buf.get_i32_le(),
            scan_start_time: buf.get_i64_le(),
        };
        buf.advance(68);
        task
    }
}

#[derive(Debug, Clone)]
pub struct BeamConfig {
    pub cut_index: i32,
    pub tx_beam_index: i32,
    pub tx_beam_elevation: f32,
    pub tx_beam_gain: f32,
    pub rx_beam_width_h: f32,
    pub rx_beam_width_v: f32,
    pub rx_beam_gain: f32,
    pub process_mode: i32,
    pub wave_form: i32,
    pub n1_prf1: f32,
    pub n1_prf2: f32,
}

impl Decode for BeamConfig {
    const SIZE: usize = 64;
    const NAME: &'static str = "pa beam config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let beam = Self {
            cut_index: buf.get_i32_le(),
            tx_beam_index: buf.get_i32_le(),
            tx_beam_elevation: buf.get_f32_le(),
            tx_beam_gain: buf.get_f32_le(),
            rx_beam_width_h: buf.get_f32_le(),
            rx_beam_width_v: buf.get_f32_le(),
            rx_beam_gain: buf.get_f32_le(),
            process_mode: buf.get_i32_le(),
            wave_form: buf.get_i32_le(),
            n1_prf1: buf.get_f32_le(),
            n1_prf2: buf.get_f32_le(),
        };
        buf.advance(20);
        beam
    }
}

#[derive(Debug, Clone)]
pub struct CutConfig {
    pub process_mode: i32,
    pub wave_form: i32,
    pub n1_prf1: f32,
    pub n1_prf2: f32,
    pub n2_prf1: f32,
    pub n2_prf2: f32,
    pub dealias_mode: i32,
    pub azimuth: f32,
    pub elevation: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub angular_resolution: f32,
    pub scan_speed: f32,
    pub log_resolution: i32,
    pub doppler_resolution: i32,
    pub maximum_range1: i32,
    pub maximum_range2: i32,
    pub start_range: i32,
    pub sample1: i32,
    pub sample2: i32,
    pub phase_mode: i32,
    pub atmospheric_loss: f32,
    pub nyquist_speed: f32,
    pub moments_mask: i64,
    pub moments_size_mask: i64,
    pub misc_filter_mask: i32,
    pub thresholds: [f32; 7],
    pub masks: [i32; 5],
    pub scan_sync: i32,
    pub direction: i32,
    pub ground_clutter: [i16; 4],
}

impl Decode for CutConfig {
    const SIZE: usize = 256;
    const NAME: &'static str = "pa cut config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let process_mode = buf.get_i32_le();
        let wave_form = buf.get_i32_le();
        let n1_prf1 = buf.get_f32_le();
        let n1_prf2 = buf.get_f32_le();
        let n2_prf1 = buf.get_f32_le();
        let n2_prf2 = buf.get_f32_le();
        let dealias_mode = buf.get_i32_le();
        let azimuth = buf.get_f32_le();
        let elevation = buf.get_f32_le();
        let start_angle = buf.get_f32_le();
        let end_angle = buf.get_f32_le();
        let angular_resolution = buf.get_f32_le();
        let scan_speed = buf.get_f32_le();
        let log_resolution = buf.get_i32_le();
        let doppler_resolution = buf.get_i32_le();
        let maximum_range1 = buf.get_i32_le();
        let maximum_range2 = buf.get_i32_le();
        let start_range = buf.get_i32_le();
        let sample1 = buf.get_i32_le();
        let sample2 = buf.get_i32_le();
        let phase_mode = buf.get_i32_le();
        let atmospheric_loss = buf.get_f32_le();
        let nyquist_speed = buf.get_f32_le();
        let moments_mask = buf.get_i64_le();
        let moments_size_mask = buf.get_i64_le();
        let misc_filter_mask = buf.get_i32_le();
        let thresholds = std::array::from_fn(|_| buf.get_f32_le());
        buf.advance(4);
        let masks = std::array::from_fn(|_| buf.get_i32_le());
        buf.advance(12);
        let scan_sync = buf.get_i32_le();
        let direction = buf.get_i32_le();
        let ground_clutter = std::array::from_fn(|_| buf.get_i16_le());
        buf.advance(64);
        Self {
            process_mode,
            wave_form,
            n1_prf1,
            n1_prf2,
            n2_prf1,
            n2_prf2,
            dealias_mode,
            azimuth,
            elevation,
            start_angle,
            end_angle,
            angular_resolution,
            scan_speed,
            log_resolution,
            doppler_resolution,
            maximum_range1,
            maximum_range2,
            start_range,
            sample1,
            sample2,
            phase_mode,
            atmospheric_loss,
            nyquist_speed,
            moments_mask,
            moments_size_mask,
            misc_filter_mask,
            thresholds,
            masks,
            scan_sync,
            direction,
            ground_clutter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RadialHeader {
    pub radial_state: i32,
    pub spot_blank: i32,
    pub sequence_number: i32,
    pub radial_number: i32,
    pub elevation_number: i32,
    pub azimuth: f32,
    pub elevation: f32,
    pub seconds: i64,
    pub microseconds: i32,
    pub length_of_data: i32,
    pub moment_number: i32,
    pub scan_beam_index: i16,
    pub horizontal_noise: i16,
    pub vertical_noise: i16,
}

impl Decode for RadialHeader {
    const SIZE: usize = 128;
    const NAME: &'static str = "pa radial header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let radial = Self {
            radial_state: buf.get_i32_le(),
            spot_blank: buf.get_i32_le(),
            sequence_number: buf.get_i32_le(),
            radial_number: buf.get_i32_le(),
            elevation_number: buf.get_i32_le(),
            azimuth: buf.get_f32_le(),
            elevation: buf.get_f32_le(),
            seconds: buf.get_i64_le(),
            microseconds: buf.get_i32_le(),
            length_of_data: buf.get_i32_le(),
            moment_number: buf.get_i32_le(),
            scan_beam_index: buf.get_i16_le(),
            horizontal_noise: buf.get_i16_le(),
            vertical_noise: buf.get_i16_le(),
        };
        buf.advance(74);
        radial
    }
}

/// Per-moment header. Physical values are `(raw - offset) / scale`.
#[derive(Debug, Clone)]
pub struct MomentHeader {
    pub data_type: i32,
    pub scale: i32,
    pub offset: i32,
    pub bin_length: i16,
    pub flags: i16,
    pub length: i32,
}

impl Decode for MomentHeader {
    const SIZE: usize = 32;
    const NAME: &'static str = "pa moment header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let moment = Self {
            data_type: buf.get_i32_le(),
            scale: buf.get_i32_le(),
            offset: buf.get_i32_le(),
            bin_length: buf.get_i16_le(),
            flags: buf.get_i16_le(),
            length: buf.get_i32_le(),
        };
        buf.advance(12);
        moment
    }
}
