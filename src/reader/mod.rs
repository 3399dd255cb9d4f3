//! Format detection and decoding of whole volume files.
//!
//! A file is read fully into memory, unwrapped when it is bzip2 or gzip
//! compressed, sniffed, and handed to the reader of the detected format.
//! Readers walk the stream as a small state machine and either return a
//! complete [`RadarVolume`] or an error; partial volumes are never returned.

pub mod cc;
mod moment;
pub mod pa;
pub mod sab;
pub mod standard;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::codec::pa::PA_GENERIC_TYPE;
use crate::codec::standard::STANDARD_MAGIC;
use crate::codec::ByteCursor;
use crate::error::{RadarError, Result};
use crate::logging::log_decode_stats;
use crate::volume::{RadarVolume, SiteInfo};

pub use cc::CcReader;
pub use pa::PaReader;
pub use sab::SabReader;
pub use standard::StandardReader;

/// Vendor formats the sniffer recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadarFormat {
    /// CMA standard base data (`RSTM`)
    Standard,
    /// Phased-array variant of the standard format
    Pa,
    /// CINRAD/SA and SB
    Sab,
    /// CINRAD/CC
    Cc,
    /// CINRAD/CC 2.0, recognised only
    Cc20,
    /// CINRAD/SC and CD, recognised only
    Sc,
}

impl RadarFormat {
    pub fn name(self) -> &'static str {
        match self {
            RadarFormat::Standard => "STANDARD",
            RadarFormat::Pa => "PA",
            RadarFormat::Sab => "SAB",
            RadarFormat::Cc => "CC",
            RadarFormat::Cc20 => "CC20",
            RadarFormat::Sc => "SC",
        }
    }
}

impl fmt::Display for RadarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of leading bytes searched for text signatures.
const SIGNATURE_WINDOW: usize = 1024;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Identify the format of an uncompressed volume file from its leading bytes.
pub fn sniff(data: &[u8]) -> Result<RadarFormat> {
    let generic_type = data
        .get(8..12)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]));

    if data.get(..4) == Some(&STANDARD_MAGIC.to_le_bytes()[..]) {
        if generic_type == Some(PA_GENERIC_TYPE) {
            return Ok(RadarFormat::Pa);
        }
        return Ok(RadarFormat::Standard);
    }
    if generic_type == Some(PA_GENERIC_TYPE) {
        return Ok(RadarFormat::Pa);
    }
    if data.get(14..16) == Some(&[1, 0][..]) {
        return Ok(RadarFormat::Sab);
    }

    let head = &data[..data.len().min(SIGNATURE_WINDOW)];
    if contains(head, b"CINRAD/SC") || contains(head, b"CINRAD/CD") {
        return Ok(RadarFormat::Sc);
    }
    if contains(head, b"CINRAD/CC") {
        return Ok(RadarFormat::Cc20);
    }
    if contains(head, b"CINRADC") {
        return Ok(RadarFormat::Cc);
    }

    Err(RadarError::UnsupportedFormat {
        message: format!(
            "no known signature in the first {} bytes",
            head.len()
        ),
    })
}

/// Replacement site values, applied after decoding.
///
/// SAB files carry no station header at all, so callers that know the site
/// supply it here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOverride {
    pub station_code: Option<String>,
    pub station_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub antenna_height: Option<f64>,
    pub beam_width_vertical: Option<f64>,
}

impl SiteOverride {
    pub fn is_empty(&self) -> bool {
        *self == SiteOverride::default()
    }

    pub fn apply(&self, site: &mut SiteInfo) {
        if let Some(code) = &self.station_code {
            site.station_code = code.clone();
        }
        if let Some(name) = &self.station_name {
            site.station_name = name.clone();
        }
        if let Some(lat) = self.latitude {
            site.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            site.longitude = lon;
        }
        if let Some(height) = self.antenna_height {
            site.antenna_height = height;
        }
        if let Some(width) = self.beam_width_vertical {
            site.beam_width_vertical = width;
        }
    }
}

/// Options shared by every format reader
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Vertical beam width in degrees for files that do not declare one
    pub default_beam_width: f64,
    pub site: SiteOverride,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            default_beam_width: 1.0,
            site: SiteOverride::default(),
        }
    }
}

/// Position of a reader in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    ReadSiteHeader,
    ReadTaskHeader,
    /// Phased-array beam configurations still to read
    ReadBeamConfigs(usize),
    /// Cut configurations still to read
    ReadCutConfigs(usize),
    ReadRadial,
    Done,
}

/// A decoder for one vendor format.
pub trait FormatReader {
    /// Format this reader decodes.
    fn format(&self) -> RadarFormat;

    /// Decode a whole uncompressed volume.
    fn read_volume(self, cursor: ByteCursor) -> Result<RadarVolume>;
}

/// Closed set of available decoders
#[derive(Debug, Clone)]
pub enum Decoder {
    Standard(StandardReader),
    Pa(PaReader),
    Sab(SabReader),
    Cc(CcReader),
}

impl Decoder {
    /// Decoder for `format`, `UnsupportedFormat` for recognised formats that
    /// have none.
    pub fn for_format(format: RadarFormat, options: &ReaderOptions) -> Result<Self> {
        match format {
            RadarFormat::Standard => Ok(Decoder::Standard(StandardReader::new(options.clone()))),
            RadarFormat::Pa => Ok(Decoder::Pa(PaReader::new(options.clone()))),
            RadarFormat::Sab => Ok(Decoder::Sab(SabReader::new(options.clone()))),
            RadarFormat::Cc => Ok(Decoder::Cc(CcReader::new(options.clone()))),
            RadarFormat::Cc20 | RadarFormat::Sc => Err(RadarError::UnsupportedFormat {
                message: format!("{} files are recognised but cannot be decoded", format),
            }),
        }
    }

    pub fn format(&self) -> RadarFormat {
        match self {
            Decoder::Standard(r) => r.format(),
            Decoder::Pa(r) => r.format(),
            Decoder::Sab(r) => r.format(),
            Decoder::Cc(r) => r.format(),
        }
    }

    pub fn decode(self, cursor: ByteCursor) -> Result<RadarVolume> {
        match self {
            Decoder::Standard(r) => r.read_volume(cursor),
            Decoder::Pa(r) => r.read_volume(cursor),
            Decoder::Sab(r) => r.read_volume(cursor),
            Decoder::Cc(r) => r.read_volume(cursor),
        }
    }
}

const BZIP2_MAGIC: &[u8] = b"BZh";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

/// Strip a bzip2 or gzip wrapper.
#[cfg(feature = "compression")]
pub fn decompress(data: Bytes) -> Result<Bytes> {
    use std::io::Read;

    let mut out = Vec::new();
    if data.starts_with(BZIP2_MAGIC) {
        bzip2::read::BzDecoder::new(&data[..]).read_to_end(&mut out)?;
    } else if data.starts_with(GZIP_MAGIC) {
        flate2::read::MultiGzDecoder::new(&data[..]).read_to_end(&mut out)?;
    } else {
        return Ok(data);
    }
    debug!(
        compressed = data.len(),
        decompressed = out.len(),
        "Decompressed volume file"
    );
    Ok(Bytes::from(out))
}

/// Strip a bzip2 or gzip wrapper.
#[cfg(not(feature = "compression"))]
pub fn decompress(data: Bytes) -> Result<Bytes> {
    if data.starts_with(BZIP2_MAGIC) || data.starts_with(GZIP_MAGIC) {
        return Err(RadarError::UnsupportedFormat {
            message: "compressed input requires the `compression` feature".to_string(),
        });
    }
    Ok(data)
}

/// Decode a volume held in memory.
pub fn read_bytes(data: impl Into<Bytes>, options: &ReaderOptions) -> Result<RadarVolume> {
    let start = Instant::now();
    let data = decompress(data.into())?;
    let format = sniff(&data)?;
    debug!(format = %format, bytes = data.len(), "Detected volume format");

    let mut volume = Decoder::for_format(format, options)?.decode(ByteCursor::new(data))?;
    if !options.site.is_empty() {
        volume.apply_site_override(&options.site);
    }
    log_decode_stats(&volume, start.elapsed());
    Ok(volume)
}

/// Decode a volume file from disk.
pub fn read_file(path: impl AsRef<Path>, options: &ReaderOptions) -> Result<RadarVolume> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading radar volume");
    let data = std::fs::read(path)?;
    read_bytes(data, options)
}
