//! cinrad-inspect - decode a radar volume file and describe its contents
//!
//! Prints a JSON summary of the site, task, dimensions and variables, and
//! optionally statistics of a CAPPI resampled from one product.

use serde::Serialize;
use std::time::Instant;
use tracing::{error, info};

use cinrad::resample::{cappi_with_beam, GridCoords};
use cinrad::{
    init_tracing, log_error, log_operation_end, log_operation_start, read_file, Config, Metadata,
    RadarError, Result, SiteInfo, TaskInfo, VolumeDimensions,
};

#[derive(Serialize)]
struct Summary<'a> {
    format: String,
    site: &'a SiteInfo,
    task: &'a TaskInfo,
    dimensions: VolumeDimensions,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
struct GridStats {
    product: String,
    height: f64,
    shape: (usize, usize),
    valid: usize,
    min: Option<f32>,
    max: Option<f32>,
    mean: Option<f64>,
}

fn grid_stats(product: &str, height: f64, values: &ndarray::Array2<f32>) -> GridStats {
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let valid = finite.len();
    let mean = (valid > 0).then(|| finite.iter().map(|&v| v as f64).sum::<f64>() / valid as f64);
    GridStats {
        product: product.to_string(),
        height,
        shape: values.dim(),
        valid,
        min: finite.iter().copied().reduce(f32::min),
        max: finite.iter().copied().reduce(f32::max),
        mean,
    }
}

fn main() -> Result<()> {
    let (config, args) = Config::load()?;
    init_tracing(&config.log_level);

    info!("Starting cinrad-inspect v{}", env!("CARGO_PKG_VERSION"));

    if let Some(workers) = config.resample.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
            .map_err(|e| RadarError::Config {
                message: format!("Failed to configure worker threads: {}", e),
            })?;
    }

    let start = Instant::now();
    log_operation_start("inspect", args.radar_file.to_str());
    let volume = read_file(&args.radar_file, &config.reader_options()).map_err(|e| {
        log_error(&e, "decoding volume file");
        e
    })?;

    let summary = Summary {
        format: volume.format().to_string(),
        site: volume.site(),
        task: volume.task(),
        dimensions: volume.dimensions(),
        metadata: volume.metadata(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(height) = args.cappi {
        if !volume.has_product(&args.product) {
            error!(product = %args.product, "Product not present, CAPPI will be empty");
        }
        let grid = GridCoords::regular(config.resample.grid_extent, config.resample.grid_spacing)?;
        let values = cappi_with_beam(
            &volume,
            &args.product,
            height,
            &grid,
            config.resample.half_beam_width,
        );
        let stats = grid_stats(&args.product, height, &values);
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    log_operation_end("inspect", start, true);
    Ok(())
}
