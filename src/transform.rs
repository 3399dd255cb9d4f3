//! Antenna and Cartesian coordinates under the 4/3 effective earth radius
//! model.
//!
//! Heights (`h` for the antenna, `z` for targets) share one vertical datum,
//! normally metres above sea level. Horizontal coordinates are metres east
//! (`x`) and north (`y`) of the radar along the earth's surface.

/// Mean earth radius in metres
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Effective radius accounting for standard atmospheric refraction
pub const EFFECTIVE_EARTH_RADIUS: f64 = EARTH_RADIUS * 4.0 / 3.0;

/// Target position of a gate.
///
/// Returns `(x, y, z)` for a slant `range` in metres at `azimuth` and
/// `elevation` in radians, seen from an antenna at height `h`.
pub fn antenna_to_cartesian(range: f64, azimuth: f64, elevation: f64, h: f64) -> (f64, f64, f64) {
    let r = EFFECTIVE_EARTH_RADIUS;
    let horizontal = range * elevation.cos();
    let vertical = r + h + range * elevation.sin();
    let z = horizontal.hypot(vertical) - r;
    let s = r * (horizontal / (r + z)).asin();
    (s * azimuth.sin(), s * azimuth.cos(), z)
}

/// Antenna coordinates of a target.
///
/// Returns `(azimuth_deg, range, elevation_deg)` for a target at `(x, y, z)`
/// seen from an antenna at height `h`.
pub fn cartesian_to_antenna(x: f64, y: f64, z: f64, h: f64) -> (f64, f64, f64) {
    let r = EFFECTIVE_EARTH_RADIUS;
    let azimuth = xy_to_azimuth(x, y);
    let theta = x.hypot(y) / r;
    let a = r + h;
    let b = r + z;

    // law of cosines in a form that keeps precision at short range
    let half = (theta / 2.0).sin();
    let range = ((b - a).powi(2) + 4.0 * a * b * half * half).sqrt();
    if range == 0.0 {
        return (azimuth, 0.0, 0.0);
    }
    let sin_elevation = ((b - a) * (b + a) - range * range) / (2.0 * a * range);
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();
    (azimuth, range, elevation)
}

/// Compass azimuth of a horizontal offset, degrees in `[0, 360)`.
pub fn xy_to_azimuth(x: f64, y: f64) -> f64 {
    let azimuth = x.atan2(y).to_degrees().rem_euclid(360.0);
    if azimuth >= 360.0 {
        0.0
    } else {
        azimuth
    }
}

/// Slant range at which a beam at `elevation` degrees reaches ground
/// distance `s`.
///
/// Returns NaN when the beam never reaches that distance.
pub fn ground_to_slant_range(s: f64, elevation: f64, h: f64) -> f64 {
    let r = EFFECTIVE_EARTH_RADIUS;
    let theta = s / r;
    let denominator = (elevation.to_radians() + theta).cos();
    if denominator <= 0.0 {
        return f64::NAN;
    }
    (r + h) * theta.sin() / denominator
}

/// Height of the beam centre after `range` metres at `elevation` degrees.
pub fn beam_height(range: f64, elevation: f64, h: f64) -> f64 {
    let r = EFFECTIVE_EARTH_RADIUS;
    let a = r + h;
    (range * range + a * a + 2.0 * range * a * elevation.to_radians().sin()).sqrt() - r
}
