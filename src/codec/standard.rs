//! Header records of the CMA standard base-data format (magic `RSTM`).

use bytes::{Buf, Bytes};

use super::cursor::{fixed_text, Decode};

/// `RSTM` read as a little-endian u32.
pub const STANDARD_MAGIC: u32 = 0x4D54_5352;

/// Task scan types that describe RHI scanning.
pub const RHI_SCAN_TYPES: [i32; 2] = [2, 5];

/// Radial state marking the last radial of the volume.
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
    const NAME: &'static str = "standard generic header";

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
    pub beam_width_h: f32,
    pub beam_width_v: f32,
    pub rda_version: i32,
    pub radar_type: i16,
    pub antenna_gain: i16,
    pub transmit_loss: i16,
    pub receive_loss: i16,
    pub other_loss: i16,
}

impl Decode for SiteConfig {
    const SIZE: usize = 128;
    const NAME: &'static str = "standard site config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let site = Self {
            site_code: fixed_text(buf, 8),
            site_name: fixed_text(buf, 32),
            latitude: buf.get_f32_le(),
            longitude: buf.get_f32_le(),
            antenna_height: buf.get_i32_le(),
            ground_height: buf.get_i32_le(),
            frequency: buf.get_f32_le(),
            beam_width_h: buf.get_f32_le(),
            beam_width_v: buf.get_f32_le(),
            rda_version: buf.get_i32_le(),
            radar_type: buf.get_i16_le(),
            antenna_gain: buf.get_i16_le(),
            transmit_loss: buf.get_i16_le(),
            receive_loss: buf.get_i16_le(),
            other_loss: buf.get_i16_le(),
        };
        buf.advance(46);
        site
    }
}

#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub task_name: String,
    pub task_description: String,
    pub polarization_type: i32,
    pub scan_type: i32,
    pub pulse_width: i32,
    /// Seconds since the unix epoch
    pub scan_start_time: i32,
    pub cut_number: i32,
    pub h_noise: f32,
    pub v_noise: f32,
    pub h_calibration: f32,
    pub v_calibration: f32,
    pub h_noise_temperature: f32,
    pub v_noise_temperature: f32,
    pub zdr_calibration: f32,
    pub phidp_calibration: f32,
    pub ldr_calibration: f32,
}

impl Decode for TaskConfig {
    const SIZE: usize = 256;
    const NAME: &'static str = "standard task config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let task = Self {
            task_name: fixed_text(buf, 32),
            task_description: fixed_text(buf, 128),
            polarization_type: buf.get_i32_le(),
            scan_type: buf.get_i32_le(),
            pulse_width: buf.get_i32_le(),
            scan_start_time: buf.get_i32_le(),
            cut_number: buf.get_i32_le(),
            h_noise: buf.get_f32_le(),
            v_noise: buf.get_f32_le(),
            h_calibration: buf.get_f32_le(),
            v_calibration: buf.get_f32_le(),
            h_noise_temperature: buf.get_f32_le(),
            v_noise_temperature: buf.get_f32_le(),
            zdr_calibration: buf.get_f32_le(),
            phidp_calibration: buf.get_f32_le(),
            ldr_calibration: buf.get_f32_le(),
        };
        buf.advance(40);
        task
    }
}

#[derive(Debug, Clone)]
pub struct CutConfig {
    pub process_mode: i32,
    pub wave_form: i32,
    pub prf1: f32,
    pub prf2: f32,
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
    /// SQI, SIG, CSR, LOG, CPA, PMI and DPLOG thresholds
    pub thresholds: [f32; 7],
    /// dBT, dBZ, velocity, spectrum width and DP masks
    pub masks: [i32; 5],
    pub scan_sync: i32,
    pub direction: i32,
    pub ground_clutter_classifier_type: i16,
    pub ground_clutter_filter_type: i16,
    pub ground_clutter_notch_width: i16,
    pub ground_clutter_filter_window: i16,
}

impl Decode for CutConfig {
    const SIZE: usize = 256;
    const NAME: &'static str = "standard cut config";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let process_mode = buf.get_i32_le();
        let wave_form = buf.get_i32_le();
        let prf1 = buf.get_f32_le();
        let prf2 = buf.get_f32_le();
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
        let mut thresholds = [0f32; 7];
        for threshold in thresholds.iter_mut() {
            *threshold = buf.get_f32_le();
        }
        buf.advance(4);
        let mut masks = [0i32; 5];
        for mask in masks.iter_mut() {
            *mask = buf.get_i32_le();
        }
        buf.advance(12);
        let cut = Self {
            process_mode,
            wave_form,
            prf1,
            prf2,
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
            scan_sync: buf.get_i32_le(),
            direction: buf.get_i32_le(),
            ground_clutter_classifier_type: buf.get_i16_le(),
            ground_clutter_filter_type: buf.get_i16_le(),
            ground_clutter_notch_width: buf.get_i16_le(),
            ground_clutter_filter_window: buf.get_i16_le(),
        };
        buf.advance(72);
        cut
    }
}

#[derive(Debug, Clone)]
pub struct RadialHeader {
    pub radial_state: i32,
    pub spot_blank: i32,
    pub sequence_number: i32,
    pub radial_number: i32,
    /// 1-based index into the cut configurations
    pub elevation_number: i32,
    pub azimuth: f32,
    pub elevation: f32,
    pub seconds: i32,
    pub microseconds: i32,
    pub length_of_data: i32,
    pub moment_number: i32,
}

impl Decode for RadialHeader {
    const SIZE: usize = 64;
    const NAME: &'static str = "standard radial header";

    fn decode_fields(buf: &mut Bytes) -> Self {
        let radial = Self {
            radial_state: buf.get_i32_le(),
            spot_blank: buf.get_i32_le(),
            sequence_number: buf.get_i32_le(),
            radial_number: buf.get_i32_le(),
            elevation_number: buf.get_i32_le(),
            azimuth: buf.get_f32_le(),
            elevation: buf.get_f32_le(),
            seconds: buf.get_i32_le(),
            microseconds: buf.get_i32_le(),
            length_of_data: buf.get_i32_le(),
            moment_number: buf.get_i32_le(),
        };
        buf.advance(20);
        radial
    }
}

/// Per-moment header. Physical values are `(raw - offset) / scale`.
#[derive(Debug, Clone)]
pub struct MomentHeader {
    pub data_type: i32,
    pub scale: i32,
    pub offset: i32,
    /// Bytes per gate, 1 or 2
    pub bin_length: i16,
    pub flags: i16,
    /// Length of the gate data in bytes
    pub length: i32,
}

impl Decode for MomentHeader {
    const SIZE: usize = 32;
    const NAME: &'static str = "standard moment header";

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
