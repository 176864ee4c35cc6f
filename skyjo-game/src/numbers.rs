//! Numeric conversion helpers centralizing lossy casts.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Arithmetic mean of a running total, `None` when nothing was counted.
#[must_use]
pub fn mean(total: i64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(i64_to_f64(total) / usize_to_f64(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_handles_empty_and_negative_totals() {
        assert_eq!(mean(0, 0), None);
        assert_eq!(mean(-30, 4), Some(-7.5));
        assert_eq!(mean(90, 3), Some(30.0));
    }

    #[test]
    fn conversions_are_exact_for_small_values() {
        assert!((i64_to_f64(-12) + 12.0).abs() < f64::EPSILON);
        assert!((usize_to_f64(150) - 150.0).abs() < f64::EPSILON);
    }
}
