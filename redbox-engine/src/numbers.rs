//! Numeric helpers centralizing safe casts and domain clamps.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Convert a usize count to f64 while allowing precision loss in one place.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Clamp an ideological axis to `[-10, 10]`, treating non-finite input as 0.
#[must_use]
pub fn clamp_axis(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(-10.0, 10.0)
}

/// Clamp a trait or 0-10 scale value, treating non-finite input as 0.
#[must_use]
pub fn clamp_scale(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 10.0)
}

/// Clamp a percentage-style value to `[0, 100]`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Clamp a success probability to the `[0.05, 0.95]` band every roll uses.
#[must_use]
pub fn clamp_probability(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.05;
    }
    value.clamp(0.05, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
    }

    #[test]
    fn axis_clamp_handles_non_finite() {
        assert!((clamp_axis(f64::NAN)).abs() < f64::EPSILON);
        assert!((clamp_axis(-25.0) - -10.0).abs() < f64::EPSILON);
        assert!((clamp_axis(25.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn probability_clamp_stays_in_band() {
        assert!((clamp_probability(0.0) - 0.05).abs() < f64::EPSILON);
        assert!((clamp_probability(1.0) - 0.95).abs() < f64::EPSILON);
        assert!((clamp_probability(f64::INFINITY) - 0.05).abs() < f64::EPSILON);
        assert!((clamp_probability(0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn scale_clamp_covers_domain() {
        assert!((clamp_scale(-3.0)).abs() < f64::EPSILON);
        assert!((clamp_scale(12.0) - 10.0).abs() < f64::EPSILON);
        assert!((clamp_percent(140.0) - 100.0).abs() < f64::EPSILON);
    }
}
