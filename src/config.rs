//! Configuration management for cinrad.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RadarError, Result};
use crate::reader::{ReaderOptions, SiteOverride};

/// Command-line arguments for cinrad-inspect
#[derive(Parser, Debug, Clone)]
#[command(name = "cinrad-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the radar volume file (optionally bzip2 or gzip compressed)
    pub radar_file: PathBuf,

    /// Path to JSON configuration file
    #[arg(short, long, env = "CINRAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CINRAD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Number of resampling threads
    #[arg(short, long, env = "CINRAD_WORKERS")]
    pub workers: Option<usize>,

    /// Vertical beam width in degrees for files that do not declare one
    #[arg(long, env = "CINRAD_BEAM_WIDTH")]
    pub beam_width: Option<f64>,

    /// Station code to report for files without a site header
    #[arg(long, env = "CINRAD_STATION")]
    pub station: Option<String>,

    /// Site latitude in degrees
    #[arg(long, env = "CINRAD_LATITUDE", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Site longitude in degrees
    #[arg(long, env = "CINRAD_LONGITUDE", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Antenna height above sea level in metres
    #[arg(long, env = "CINRAD_ANTENNA_HEIGHT")]
    pub antenna_height: Option<f64>,

    /// Product to resample
    #[arg(short, long, default_value = "dBZ")]
    pub product: String,

    /// Print statistics of a CAPPI at this height in metres
    #[arg(long)]
    pub cappi: Option<f64>,

    /// Half width of the square inspection grid in metres
    #[arg(long, env = "CINRAD_GRID_EXTENT")]
    pub grid_extent: Option<f64>,

    /// Spacing of the inspection grid in metres
    #[arg(long, env = "CINRAD_GRID_SPACING")]
    pub grid_spacing: Option<f64>,
}

/// Decoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Vertical beam width for formats that do not declare one
    #[serde(default = "default_beam_width")]
    pub default_beam_width: f64,

    /// Site values replacing or filling in decoded ones
    #[serde(default)]
    pub site: SiteOverride,
}

/// Resampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Half beam width used by CAPPI instead of the site's
    #[serde(default)]
    pub half_beam_width: Option<f64>,

    /// Half width of the inspection grid in metres
    #[serde(default = "default_grid_extent")]
    pub grid_extent: f64,

    /// Spacing of the inspection grid in metres
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Decoding configuration
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Resampling configuration
    #[serde(default)]
    pub resample: ResampleConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Args)> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args))
    }

    /// Build configuration from parsed arguments and the file they name
    pub fn from_args(args: &Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }
        if args.workers.is_some() {
            config.resample.workers = args.workers;
        }
        if let Some(width) = args.beam_width {
            config.decode.default_beam_width = width;
        }
        if let Some(extent) = args.grid_extent {
            config.resample.grid_extent = extent;
        }
        if let Some(spacing) = args.grid_spacing {
            config.resample.grid_spacing = spacing;
        }
        let site = &mut config.decode.site;
        if args.station.is_some() {
            site.station_code = args.station.clone();
        }
        if args.latitude.is_some() {
            site.latitude = args.latitude;
        }
        if args.longitude.is_some() {
            site.longitude = args.longitude;
        }
        if args.antenna_height.is_some() {
            site.antenna_height = args.antenna_height;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.decode = other.decode;
        if other.resample.workers.is_some() {
            self.resample.workers = other.resample.workers;
        }
        if other.resample.half_beam_width.is_some() {
            self.resample.half_beam_width = other.resample.half_beam_width;
        }
        self.resample.grid_extent = other.resample.grid_extent;
        self.resample.grid_spacing = other.resample.grid_spacing;
        self.log_level = other.log_level;
    }

    /// Reader options carried by this configuration
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            default_beam_width: self.decode.default_beam_width,
            site: self.decode.site.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let beam_width = self.decode.default_beam_width;
        if !(beam_width.is_finite() && beam_width > 0.0) {
            return Err(RadarError::Config {
                message: format!("Default beam width must be positive, got {}", beam_width),
            });
        }

        if let Some(lat) = self.decode.site.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(RadarError::Config {
                    message: format!("Latitude {} is outside [-90, 90]", lat),
                });
            }
        }
        if let Some(lon) = self.decode.site.longitude {
            if !(-180.0..=360.0).contains(&lon) {
                return Err(RadarError::Config {
                    message: format!("Longitude {} is outside [-180, 360]", lon),
                });
            }
        }

        if self.resample.workers == Some(0) {
            return Err(RadarError::Config {
                message: "Worker count cannot be 0".to_string(),
            });
        }
        if let Some(half) = self.resample.half_beam_width {
            if !(half.is_finite() && half > 0.0) {
                return Err(RadarError::Config {
                    message: format!("Half beam width must be positive, got {}", half),
                });
            }
        }
        let grid = &self.resample;
        if !(grid.grid_spacing > 0.0 && grid.grid_extent >= 0.0) {
            return Err(RadarError::Config {
                message: format!(
                    "Grid spacing {} and extent {} must be positive",
                    grid.grid_spacing, grid.grid_extent
                ),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(RadarError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decode: DecodeConfig::default(),
            resample: ResampleConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            default_beam_width: default_beam_width(),
            site: SiteOverride::default(),
        }
    }
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            workers: None,
            half_beam_width: None,
            grid_extent: default_grid_extent(),
            grid_spacing: default_grid_spacing(),
        }
    }
}

// Default value functions for serde
fn default_beam_width() -> f64 {
    1.0
}

fn default_grid_extent() -> f64 {
    230_000.0
}

fn default_grid_spacing() -> f64 {
    1000.0
}

fn default_log_level() -> String {
    "info".to_string()
}
