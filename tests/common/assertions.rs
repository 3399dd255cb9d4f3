//! Float assertions for decoded gate values.
//!
//! Missing gates decode to NaN, so the helpers here distinguish between a
//! tolerance comparison and a missing-value check.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Assert that two values differ by at most `epsilon` (default 1e-6).
pub fn assert_approx_eq(actual: f32, expected: f32, epsilon: Option<f32>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Element-wise [`assert_approx_eq`] over a radial or row of values.
///
/// # Panics
///
/// Panics if the lengths differ or any element is out of tolerance.
pub fn assert_array_approx_eq(actual: &[f32], expected: &[f32], epsilon: Option<f32>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arrays have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= eps,
            "Arrays differ at gate {}: actual = {}, expected = {}, epsilon = {}",
            i,
            a,
            e,
            eps
        );
    }
}

/// Assert that two values are approximately equal, treating NaN as equal to
/// NaN.
///
/// Decoded gates and resampled cells use NaN for missing data, so an
/// expected NaN must match an actual NaN.
pub fn assert_value_eq(actual: f32, expected: f32, epsilon: Option<f32>) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "Expected missing value, got {}", actual);
        return;
    }
    assert_approx_eq(actual, expected, epsilon);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(-28.0, -28.0, None);
        assert_approx_eq(1.0, 1.0000001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    #[should_panic(expected = "Values not approximately equal")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq(f32::NAN, 1.0, None);
    }

    #[test]
    fn test_assert_array_approx_eq() {
        assert_array_approx_eq(&[-5.5, 5.5], &[-5.5, 5.5], None);
        assert_array_approx_eq(&[1.0, 2.0], &[1.001, 2.001], Some(0.01));
    }

    #[test]
    #[should_panic(expected = "Arrays differ at gate 1")]
    fn test_assert_array_approx_eq_reports_gate() {
        assert_array_approx_eq(&[1.0, 2.0], &[1.0, 3.0], None);
    }

    #[test]
    fn test_assert_value_eq() {
        assert_value_eq(f32::NAN, f32::NAN, None);
        assert_value_eq(-23.0, -23.0, None);
    }

    #[test]
    #[should_panic(expected = "Expected missing value")]
    fn test_assert_value_eq_rejects_value_for_nan() {
        assert_value_eq(2.0, f32::NAN, None);
    }
}
