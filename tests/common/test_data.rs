//! Test data generation utilities.
//!
//! Writers for small synthetic volume files in each supported vendor
//! layout, with known gate codes so decoded values can be checked exactly.

use bytes::BufMut;

/// `RSTM` magic
pub const STANDARD_MAGIC: u32 = 0x4D54_5352;

fn put_text(buf: &mut Vec<u8>, text: &str, width: usize) {
    let bytes = text.as_bytes();
    let n = bytes.len().min(width);
    buf.extend_from_slice(&bytes[..n]);
    buf.put_bytes(0, width - n);
}

fn put_at(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// One moment block of a standard or phased-array radial.
#[derive(Debug, Clone)]
pub struct Moment {
    pub data_type: i32,
    pub scale: i32,
    pub offset: i32,
    pub bin_length: i16,
    pub data: Vec<u8>,
}

impl Moment {
    /// Single-byte moment with header scale 2 and offset 66.
    pub fn bytes(data_type: i32, codes: &[u8]) -> Self {
        Self {
            data_type,
            scale: 2,
            offset: 66,
            bin_length: 1,
            data: codes.to_vec(),
        }
    }

    /// Two-byte moment with the given header scale and offset.
    pub fn words(data_type: i32, scale: i32, offset: i32, codes: &[u16]) -> Self {
        let mut data = Vec::new();
        for &c in codes {
            data.put_u16_le(c);
        }
        Self {
            data_type,
            scale,
            offset,
            bin_length: 2,
            data,
        }
    }
}

/// One radial of a standard or phased-array volume.
#[derive(Debug, Clone)]
pub struct Radial {
    pub state: i32,
    /// 1-based cut
    pub elevation_number: i32,
    pub azimuth: f32,
    pub elevation: f32,
    pub moments: Vec<Moment>,
}

impl Radial {
    pub fn new(elevation_number: i32, azimuth: f32, elevation: f32, moments: Vec<Moment>) -> Self {
        Self {
            state: 1,
            elevation_number,
            azimuth,
            elevation,
            moments,
        }
    }
}

/// Declared cut geometry.
#[derive(Debug, Clone, Copy)]
pub struct Cut {
    pub elevation: f32,
    pub start_range: i32,
    pub log_resolution: i32,
    pub doppler_resolution: i32,
}

/// A standard or phased-array volume description.
#[derive(Debug, Clone)]
pub struct BaseVolume {
    pub site_code: String,
    pub latitude: f32,
    pub longitude: f32,
    pub antenna_height: i32,
    pub beam_width_v: f32,
    pub scan_type: i32,
    pub scan_start: i64,
    pub cuts: Vec<Cut>,
    pub radials: Vec<Radial>,
}

impl Default for BaseVolume {
    fn default() -> Self {
        Self {
            site_code: "Z9999".to_string(),
            latitude: 30.0,
            longitude: 120.0,
            antenna_height: 0,
            beam_width_v: 1.0,
            scan_type: 0,
            scan_start: 1_600_000_000,
            cuts: Vec::new(),
            radials: Vec::new(),
        }
    }
}

fn put_moment(buf: &mut Vec<u8>, moment: &Moment) {
    buf.put_i32_le(moment.data_type);
    buf.put_i32_le(moment.scale);
    buf.put_i32_le(moment.offset);
    buf.put_i16_le(moment.bin_length);
    buf.put_i16_le(0);
    buf.put_i32_le(moment.data.len() as i32);
    buf.put_bytes(0, 12);
    buf.extend_from_slice(&moment.data);
}

fn moments_length(radial: &Radial) -> i32 {
    radial.moments.iter().map(|m| 32 + m.data.len() as i32).sum()
}

/// Encode a volume in the standard layout.
pub fn standard_bytes(volume: &BaseVolume) -> Vec<u8> {
    let mut buf = Vec::new();

    // generic header
    buf.put_u32_le(STANDARD_MAGIC);
    buf.put_u16_le(1);
    buf.put_u16_le(0);
    buf.put_i32_le(1);
    buf.put_i32_le(0);
    buf.put_bytes(0, 16);

    // site
    put_text(&mut buf, &volume.site_code, 8);
    put_text(&mut buf, "Test site", 32);
    buf.put_f32_le(volume.latitude);
    buf.put_f32_le(volume.longitude);
    buf.put_i32_le(volume.antenna_height);
    buf.put_i32_le(volume.antenna_height);
    buf.put_f32_le(2800.0);
    buf.put_f32_le(0.95);
    buf.put_f32_le(volume.beam_width_v);
    buf.put_i32_le(1);
    buf.put_i16_le(1);
    buf.put_bytes(0, 8 + 46);

    // task
    put_text(&mut buf, "VCP21D", 32);
    put_text(&mut buf, "", 128);
    buf.put_i32_le(1);
    buf.put_i32_le(volume.scan_type);
    buf.put_i32_le(1);
    buf.put_i32_le(volume.scan_start as i32);
    buf.put_i32_le(volume.cuts.len() as i32);
    buf.put_bytes(0, 9 * 4 + 40);

    for cut in &volume.cuts {
        let mut raw = vec![0u8; 256];
        put_at(&mut raw, 24, &cut.elevation.to_le_bytes());
        put_at(&mut raw, 44, &cut.log_resolution.to_le_bytes());
        put_at(&mut raw, 48, &cut.doppler_resolution.to_le_bytes());
        put_at(&mut raw, 60, &cut.start_range.to_le_bytes());
        buf.extend_from_slice(&raw);
    }

    for (i, radial) in volume.radials.iter().enumerate() {
        buf.put_i32_le(radial.state);
        buf.put_i32_le(0);
        buf.put_i32_le(i as i32 + 1);
        buf.put_i32_le(i as i32 + 1);
        buf.put_i32_le(radial.elevation_number);
        buf.put_f32_le(radial.azimuth);
        buf.put_f32_le(radial.elevation);
        buf.put_i32_le(volume.scan_start as i32);
        buf.put_i32_le(0);
        buf.put_i32_le(moments_length(radial));
        buf.put_i32_le(radial.moments.len() as i32);
        buf.put_bytes(0, 20);
        for moment in &radial.moments {
            put_moment(&mut buf, moment);
        }
    }
    buf
}

/// Encode a volume in the phased-array layout with one beam per cut.
pub fn pa_bytes(volume: &BaseVolume) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.put_u32_le(STANDARD_MAGIC);
    buf.put_u16_le(1);
    buf.put_u16_le(0);
    buf.put_i32_le(16);
    buf.put_i32_le(0);
    buf.put_bytes(0, 16);

    put_text(&mut buf, &volume.site_code, 8);
    put_text(&mut buf, "Phased array", 32);
    buf.put_f32_le(volume.latitude);
    buf.put_f32_le(volume.longitude);
    buf.put_i32_le(volume.antenna_height);
    buf.put_i32_le(volume.antenna_height);
    buf.put_f32_le(9400.0);
    buf.put_i32_le(1);
    buf.put_i32_le(64);
    buf.put_i32_le(1);
    buf.put_i16_le(65);
    buf.put_bytes(0, 54);

    put_text(&mut buf, "PA task", 32);
    put_text(&mut buf, "", 128);
    buf.put_i32_le(1);
    buf.put_i32_le(volume.scan_type);
    buf.put_i32_le(volume.cuts.len() as i32);
    buf.put_i32_le(volume.cuts.len() as i32);
    buf.put_i32_le(0);
    buf.put_i64_le(volume.scan_start);
    buf.put_bytes(0, 68);

    for (i, cut) in volume.cuts.iter().enumerate() {
        let mut raw = vec![0u8; 64];
        put_at(&mut raw, 0, &(i as i32).to_le_bytes());
        put_at(&mut raw, 8, &cut.elevation.to_le_bytes());
        put_at(&mut raw, 20, &volume.beam_width_v.to_le_bytes());
        buf.extend_from_slice(&raw);
    }

    for cut in &volume.cuts {
        let mut raw = vec![0u8; 256];
        put_at(&mut raw, 32, &cut.elevation.to_le_bytes());
        put_at(&mut raw, 52, &cut.log_resolution.to_le_bytes());
        put_at(&mut raw, 56, &cut.doppler_resolution.to_le_bytes());
        put_at(&mut raw, 68, &cut.start_range.to_le_bytes());
        buf.extend_from_slice(&raw);
    }

    for (i, radial) in volume.radials.iter().enumerate() {
        buf.put_i32_le(radial.state);
        buf.put_i32_le(0);
        buf.put_i32_le(i as i32 + 1);
        buf.put_i32_le(i as i32 + 1);
        buf.put_i32_le(radial.elevation_number);
        buf.put_f32_le(radial.azimuth);
        buf.put_f32_le(radial.elevation);
        buf.put_i64_le(volume.scan_start);
        buf.put_i32_le(0);
        buf.put_i32_le(moments_length(radial));
        buf.put_i32_le(radial.moments.len() as i32);
        buf.put_i16_le(0);
        buf.put_i16_le(0);
        buf.put_i16_le(0);
        buf.put_bytes(0, 74);
        for moment in &radial.moments {
            put_moment(&mut buf, moment);
        }
    }
    buf
}

/// Degrees to a SAB angle code.
pub fn sab_angle_code(degrees: f64) -> u16 {
    (degrees * 8.0 * 4096.0 / 180.0).round() as u16
}

/// One SAB radial record.
#[derive(Debug, Clone)]
pub struct SabRadial {
    pub message_type: u16,
    pub radial_number: u16,
    pub azimuth: f64,
    pub elevation: f64,
    pub elevation_number: u16,
    pub reflectivity: Vec<u8>,
    pub velocity: Vec<u8>,
    pub spectrum_width: Vec<u8>,
    pub velocity_resolution: u16,
}

impl SabRadial {
    pub fn new(radial_number: u16, azimuth: f64, elevation: f64) -> Self {
        Self {
            message_type: 1,
            radial_number,
            azimuth,
            elevation,
            elevation_number: 1,
            reflectivity: Vec::new(),
            velocity: Vec::new(),
            spectrum_width: Vec::new(),
            velocity_resolution: 2,
        }
    }
}

/// Byte used to fill unused parts of SAB and CC blocks.
pub const PADDING: u8 = 0xEE;

/// Encode SAB radials, filling block padding with [`PADDING`].
///
/// Reflectivity gates are 1000 m apart starting at 1000 m; Doppler gates are
/// 250 m apart starting at 250 m. The Doppler gate count is the velocity
/// length.
pub fn sab_bytes(radials: &[SabRadial]) -> Vec<u8> {
    let mut buf = Vec::new();
    for radial in radials {
        let mut raw = vec![0u8; 2432];
        put_at(&mut raw, 14, &radial.message_type.to_le_bytes());
        put_at(&mut raw, 28, &(8u32 * 3_600_000).to_le_bytes());
        put_at(&mut raw, 32, &19_000u16.to_le_bytes());
        put_at(&mut raw, 36, &sab_angle_code(radial.azimuth).to_le_bytes());
        put_at(&mut raw, 38, &radial.radial_number.to_le_bytes());
        put_at(&mut raw, 42, &sab_angle_code(radial.elevation).to_le_bytes());
        put_at(&mut raw, 44, &radial.elevation_number.to_le_bytes());
        put_at(&mut raw, 46, &1000i16.to_le_bytes());
        put_at(&mut raw, 48, &250i16.to_le_bytes());
        put_at(&mut raw, 50, &1000u16.to_le_bytes());
        put_at(&mut raw, 52, &250u16.to_le_bytes());
        put_at(&mut raw, 54, &(radial.reflectivity.len() as u16).to_le_bytes());
        put_at(&mut raw, 56, &(radial.velocity.len() as u16).to_le_bytes());
        put_at(&mut raw, 70, &radial.velocity_resolution.to_le_bytes());
        put_at(&mut raw, 72, &21u16.to_le_bytes());

        raw[128..2428].fill(PADDING);
        put_at(&mut raw, 128, &radial.reflectivity);
        put_at(&mut raw, 128 + 460, &radial.velocity);
        put_at(&mut raw, 128 + 460 + 920, &radial.spectrum_width);
        buf.extend_from_slice(&raw);
    }
    buf
}

/// A CC layer.
#[derive(Debug, Clone, Copy)]
pub struct CcLayer {
    /// Degrees
    pub elevation: f64,
    pub bin_width: u16,
    pub bin_number: u16,
}

/// One CC radial; values are tenths of the physical unit.
#[derive(Debug, Clone)]
pub struct CcRadial {
    pub radial_number: u16,
    pub azimuth: f64,
    pub elevation: f64,
    pub reflectivity: Option<Vec<i16>>,
    pub velocity: Option<Vec<i16>>,
    pub spectrum_width: Option<Vec<i16>>,
}

/// A CC volume description.
#[derive(Debug, Clone)]
pub struct CcVolume {
    pub scan_mode: u8,
    pub process_type: u16,
    pub beam_width_v: u16,
    pub layers: Vec<CcLayer>,
    /// Bytes between the header and the first radial
    pub gap: usize,
    pub radials: Vec<CcRadial>,
}

impl Default for CcVolume {
    fn default() -> Self {
        Self {
            scan_mode: 10,
            process_type: 1,
            beam_width_v: 100,
            layers: Vec::new(),
            gap: 0,
            radials: Vec::new(),
        }
    }
}

/// Encode a CC volume, filling block padding with [`PADDING`].
pub fn cc_bytes(volume: &CcVolume) -> Vec<u8> {
    let mut header = vec![0u8; 1024];
    put_at(&mut header, 0, b"CINRADC");
    put_at(&mut header, 106, b"58238");
    put_at(&mut header, 168, &118_800i32.to_le_bytes());
    put_at(&mut header, 172, &32_000i32.to_le_bytes());
    put_at(&mut header, 176, &45_500i32.to_le_bytes());
    put_at(&mut header, 184, &[20, 9, 7, 15, 8, 30, 0]);
    header[199] = volume.scan_mode;
    for (i, layer) in volume.layers.iter().enumerate() {
        let base = 218 + i * 22;
        put_at(&mut header, base + 14, &layer.bin_width.to_le_bytes());
        put_at(&mut header, base + 16, &layer.bin_number.to_le_bytes());
        let sweep = (layer.elevation * 100.0).round() as i16;
        put_at(&mut header, base + 20, &sweep.to_le_bytes());
    }
    put_at(&mut header, 892, &volume.beam_width_v.to_le_bytes());
    put_at(&mut header, 910, &volume.process_type.to_le_bytes());
    let data_offset = if volume.gap > 0 { 1024 + volume.gap as u32 } else { 0 };
    put_at(&mut header, 1017, &data_offset.to_le_bytes());

    let mut buf = header;
    buf.put_bytes(PADDING, volume.gap);

    for radial in &volume.radials {
        let mut flags = 0u8;
        for (bit, block) in [
            (1u8, &radial.reflectivity),
            (2, &radial.velocity),
            (4, &radial.spectrum_width),
        ] {
            if block.is_some() {
                flags |= bit;
            }
        }
        buf.put_u16_le(radial.radial_number);
        buf.put_u16_le((radial.azimuth * 100.0).round() as u16);
        buf.put_i16_le((radial.elevation * 100.0).round() as i16);
        buf.put_u8(flags);
        buf.put_u8(0);
        for block in [&radial.reflectivity, &radial.velocity, &radial.spectrum_width] {
            let mut raw = vec![PADDING; 1000];
            if let Some(values) = block {
                for (i, v) in values.iter().enumerate() {
                    put_at(&mut raw, i * 2, &v.to_le_bytes());
                }
            }
            buf.extend_from_slice(&raw);
        }
    }
    buf
}
