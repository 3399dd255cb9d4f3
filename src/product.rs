//! Radar moment (product) catalogue.

use serde::{Deserialize, Serialize};

/// Receiver channel a product is measured on. Log-channel and Doppler-channel
/// products use different gate sizes and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Log,
    Doppler,
}

/// Static description of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductInfo {
    /// Moment data-type code used by the standard and phased-array formats
    pub code: i32,
    pub name: &'static str,
    pub long_name: &'static str,
    pub units: &'static str,
    pub channel: Channel,
}

const fn product(
    code: i32,
    name: &'static str,
    long_name: &'static str,
    units: &'static str,
    channel: Channel,
) -> ProductInfo {
    ProductInfo {
        code,
        name,
        long_name,
        units,
        channel,
    }
}

pub const REFLECTIVITY: &str = "dBZ";
pub const VELOCITY: &str = "V";
pub const SPECTRUM_WIDTH: &str = "W";

static PRODUCTS: &[ProductInfo] = &[
    product(1, "dBT", "Total reflectivity", "dBZ", Channel::Log),
    product(2, "dBZ", "Reflectivity", "dBZ", Channel::Log),
    product(3, "V", "Radial velocity", "m/s", Channel::Doppler),
    product(4, "W", "Spectrum width", "m/s", Channel::Doppler),
    product(5, "SQI", "Signal quality index", "", Channel::Log),
    product(6, "CPA", "Clutter phase alignment", "", Channel::Log),
    product(7, "ZDR", "Differential reflectivity", "dB", Channel::Log),
    product(8, "LDR", "Linear depolarization ratio", "dB", Channel::Log),
    product(9, "CC", "Cross correlation coefficient", "", Channel::Log),
    product(10, "PhiDP", "Differential phase", "deg", Channel::Log),
    product(11, "KDP", "Specific differential phase", "deg/km", Channel::Log),
    product(12, "CP", "Clutter probability", "", Channel::Log),
    product(14, "HCL", "Hydrometeor classification", "", Channel::Log),
    product(15, "CF", "Clutter flag", "", Channel::Log),
    product(16, "SNRH", "Horizontal signal to noise ratio", "dB", Channel::Log),
    product(17, "SNRV", "Vertical signal to noise ratio", "dB", Channel::Log),
    product(32, "Zc", "Corrected reflectivity", "dBZ", Channel::Log),
    product(33, "Vc", "Corrected radial velocity", "m/s", Channel::Doppler),
    product(34, "Wc", "Corrected spectrum width", "m/s", Channel::Doppler),
    product(35, "ZDRc", "Corrected differential reflectivity", "dB", Channel::Log),
];

/// Look up a product by its moment data-type code.
pub fn by_code(code: i32) -> Option<&'static ProductInfo> {
    PRODUCTS.iter().find(|p| p.code == code)
}

/// Look up a product by name.
pub fn by_name(name: &str) -> Option<&'static ProductInfo> {
    PRODUCTS.iter().find(|p| p.name == name)
}

/// Channel of a product; unknown names are treated as log-channel.
pub fn channel_of(name: &str) -> Channel {
    by_name(name).map(|p| p.channel).unwrap_or(Channel::Log)
}
