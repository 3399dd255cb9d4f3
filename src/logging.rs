//! Logging utilities for cinrad.
//!
//! Structured `tracing` helpers shared by the readers, the resampler and the
//! inspection binary.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::volume::RadarVolume;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log what a decoded volume contains
pub fn log_decode_stats(volume: &RadarVolume, elapsed: Duration) {
    let dims = volume.dimensions();
    let products: Vec<&str> = volume.products().collect();
    info!(
        operation = "decode",
        format = %volume.format(),
        station = %volume.site().station_code,
        product_count = products.len(),
        products = %products.join(", "),
        scans = dims.scan_count,
        max_radials = dims.max_radial_count,
        log_gates = dims.log_gate_count,
        doppler_gates = dims.doppler_gate_count,
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        "Volume decoded"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::RadarError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}
