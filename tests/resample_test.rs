//! Integration tests for resampling
//!
//! A two-scan synthetic volume is decoded once and shared by every test.

mod common;

use cinrad::resample::{cappi, cappi_with_beam, composite, grid_3d, ppi, vcs, GridCoords};
use cinrad::transform::{beam_height, ground_to_slant_range};
use cinrad::{read_bytes, RadarError, RadarVolume, ReaderOptions};
use common::assertions::{assert_approx_eq, assert_value_eq};
use common::test_data::{standard_bytes, BaseVolume, Cut, Moment, Radial};
use ndarray::Array2;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

const ANTENNA_HEIGHT: i32 = 100;
const LOW: f32 = 0.5;
const HIGH: f32 = 3.0;

/// 17 dBZ everywhere at 0.5 degrees; at 3 degrees 27 dBZ inside 100 km and
/// 7 dBZ beyond.
static VOLUME: Lazy<RadarVolume> = Lazy::new(|| {
    let cut = |elevation| Cut {
        elevation,
        start_range: 0,
        log_resolution: 1000,
        doppler_resolution: 1000,
    };
    let mut radials = Vec::new();
    for azimuth in 0..360 {
        radials.push(Radial::new(
            1,
            azimuth as f32,
            LOW,
            vec![Moment::bytes(2, &[100; 200])],
        ));
    }
    let high: Vec<u8> = (0..200).map(|g| if g < 100 { 120 } else { 80 }).collect();
    for azimuth in 0..360 {
        radials.push(Radial::new(
            2,
            azimuth as f32,
            HIGH,
            vec![Moment::bytes(2, &high)],
        ));
    }
    let volume = BaseVolume {
        antenna_height: ANTENNA_HEIGHT,
        beam_width_v: 1.0,
        cuts: vec![cut(LOW), cut(HIGH)],
        radials,
        ..Default::default()
    };
    read_bytes(standard_bytes(&volume), &ReaderOptions::default()).unwrap()
});

fn h() -> f64 {
    ANTENNA_HEIGHT as f64
}

/// Height at which a beam at `elevation` passes ground distance `s`.
fn height_at(s: f64, elevation: f64) -> f64 {
    beam_height(ground_to_slant_range(s, elevation, h()), elevation, h())
}

fn nan_max(a: f32, b: f32) -> f32 {
    match (a.is_nan(), b.is_nan()) {
        (true, _) => b,
        (_, true) => a,
        _ => a.max(b),
    }
}

#[test]
fn test_ppi_follows_the_beam() {
    let grid = GridCoords::from_axes(&[0.0, 50_000.0], &[50_000.0, 150_000.0, 250_000.0]);
    let low = ppi(&VOLUME, "dBZ", 0, &grid);
    assert_eq!(low.dim(), (3, 2));
    assert_value_eq(low[[0, 0]], 17.0, None);
    assert_value_eq(low[[1, 1]], 17.0, None);
    // beyond the last gate
    assert_value_eq(low[[2, 0]], f32::NAN, None);

    let high = ppi(&VOLUME, "dBZ", 1, &grid);
    assert_value_eq(high[[0, 0]], 27.0, None);
    assert_value_eq(high[[1, 0]], 7.0, None);

    let missing_scan = ppi(&VOLUME, "dBZ", 5, &grid);
    assert!(missing_scan.iter().all(|v| v.is_nan()));
}

#[test]
fn test_composite_is_scan_maximum() {
    let grid = GridCoords::regular(200_000.0, 25_000.0).unwrap();
    let result = composite(&VOLUME, "dBZ", &grid);

    let scans: Vec<Array2<f32>> = (0..2).map(|s| ppi(&VOLUME, "dBZ", s, &grid)).collect();
    for ((i, j), &value) in result.indexed_iter() {
        let expected = nan_max(scans[0][[i, j]], scans[1][[i, j]]);
        assert_value_eq(value, expected, None);
    }

    let grid = GridCoords::from_axes(&[0.0], &[50_000.0, 150_000.0]);
    let result = composite(&VOLUME, "dBZ", &grid);
    assert_value_eq(result[[0, 0]], 27.0, None);
    assert_value_eq(result[[1, 0]], 17.0, None);
}

#[test]
fn test_composite_matches_cappi_at_beam_heights() {
    let s = 60_000.0;
    let grid = GridCoords::from_axes(&[0.0], &[s]);
    let levels: Vec<f32> = [LOW, HIGH]
        .iter()
        .map(|&el| cappi(&VOLUME, "dBZ", height_at(s, el as f64), &grid)[[0, 0]])
        .collect();
    let expected = levels.into_iter().fold(f32::NAN, nan_max);
    assert_value_eq(composite(&VOLUME, "dBZ", &grid)[[0, 0]], expected, None);
    assert_value_eq(expected, 27.0, None);
}

#[test]
fn test_cappi_is_beam_limited() {
    let s = 50_000.0;
    let grid = GridCoords::from_axes(&[s], &[0.0]);

    let on_low_beam = cappi(&VOLUME, "dBZ", height_at(s, LOW as f64), &grid);
    assert_value_eq(on_low_beam[[0, 0]], 17.0, None);

    let on_high_beam = cappi(&VOLUME, "dBZ", height_at(s, HIGH as f64), &grid);
    assert_value_eq(on_high_beam[[0, 0]], 27.0, None);

    // between the beams: 1.1 degrees from the nearest scan, half beam width 0.5
    let gap = height_at(s, 1.6);
    assert_value_eq(cappi(&VOLUME, "dBZ", gap, &grid)[[0, 0]], f32::NAN, None);

    let wide = cappi_with_beam(&VOLUME, "dBZ", gap, &grid, Some(1.5));
    assert_value_eq(wide[[0, 0]], 17.0, None);
}

#[test]
fn test_grid_3d_stacks_cappi_levels() {
    let grid = GridCoords::regular(100_000.0, 20_000.0).unwrap();
    let levels = [1_000.0, 3_000.0, 6_000.0];
    let cube = grid_3d(&VOLUME, "dBZ", &levels, &grid);
    assert_eq!(cube.dim(), (3, 11, 11));
    for (k, &z) in levels.iter().enumerate() {
        let plane = cappi(&VOLUME, "dBZ", z, &grid);
        for ((i, j), &value) in plane.indexed_iter() {
            assert_value_eq(cube[[k, i, j]], value, None);
        }
    }
}

#[test]
fn test_missing_product_yields_nan() {
    let grid = GridCoords::regular(10_000.0, 5_000.0).unwrap();
    for values in [
        ppi(&VOLUME, "ZDR", 0, &grid),
        cappi(&VOLUME, "ZDR", 1_000.0, &grid),
        composite(&VOLUME, "ZDR", &grid),
    ] {
        assert_eq!(values.dim(), (5, 5));
        assert!(values.iter().all(|v| v.is_nan()));
    }
    let cube = grid_3d(&VOLUME, "ZDR", &[1_000.0, 2_000.0], &grid);
    assert_eq!(cube.dim(), (2, 5, 5));
    assert!(cube.iter().all(|v| v.is_nan()));
    assert!(vcs(&VOLUME, "ZDR", (0.0, 0.0), (10_000.0, 0.0)).is_empty());
}

#[test]
fn test_vcs_mesh() {
    let mesh = vcs(&VOLUME, "dBZ", (0.0, 10_000.0), (0.0, 60_000.0));
    assert_eq!(mesh.shape(), (2, 51));
    assert_eq!(mesh.elevations, vec![LOW as f64, HIGH as f64]);
    assert_approx_eq(mesh.distance[50] as f32, 50_000.0, None);
    assert_approx_eq(mesh.y[0] as f32, 10_000.0, None);
    assert!(mesh.x.iter().all(|&x| x == 0.0));

    assert!(mesh.values.row(0).iter().all(|&v| v == 17.0));
    assert!(mesh.values.row(1).iter().all(|&v| v == 27.0));
    for (low, high) in mesh.z_low.iter().zip(mesh.z_high.iter()) {
        assert!(low < high);
    }
    // the upper scan climbs faster
    assert!(mesh.z_low[[1, 50]] > mesh.z_high[[0, 50]]);
}

#[test]
fn test_grid_validation() {
    assert!(matches!(
        GridCoords::regular(1_000.0, 0.0),
        Err(RadarError::InvalidParameter { .. })
    ));
    assert!(GridCoords::regular(-1.0, 100.0).is_err());
    assert!(GridCoords::new(Array2::zeros((2, 3)), Array2::zeros((3, 2))).is_err());

    let grid = GridCoords::regular(1_000.0, 500.0).unwrap();
    assert_eq!(grid.shape(), (5, 5));
    assert_eq!(grid.x()[[0, 0]], -1_000.0);
    assert_eq!(grid.y()[[4, 0]], 1_000.0);
}
