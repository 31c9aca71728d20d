//! Shared utility functions for clima crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Calendar year of a date key.
    pub fn year_of(date: &NaiveDate) -> i32 {
        date.year()
    }

    /// Get the decade bucket for a year.
    /// e.g., 1985 -> 1980, 2020 -> 2020, -5 -> -10
    pub fn decade_of(year: i32) -> i32 {
        year.div_euclid(10) * 10
    }

    /// Human label for a decade bucket, e.g. 1980 -> "1980s"
    pub fn decade_label(decade: i32) -> String {
        format!("{decade}s")
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_decade_of() {
            assert_eq!(decade_of(1985), 1980);
            assert_eq!(decade_of(1980), 1980);
            assert_eq!(decade_of(1989), 1980);
            assert_eq!(decade_of(2020), 2020);
            assert_eq!(decade_of(-5), -10);
        }

        #[test]
        fn test_decade_label() {
            assert_eq!(decade_label(1940), "1940s");
        }

        #[test]
        fn test_year_of() {
            let date = NaiveDate::from_ymd_opt(1987, 1, 31).unwrap();
            assert_eq!(year_of(&date), 1987);
            assert_eq!(decade_of(year_of(&date)), 1980);
        }
    }
}

/// Scalar helpers shared by the statistics and chart-facing code.
///
/// Non-finite values (NaN, +/-inf) stand for missing data throughout the
/// workspace and are skipped by the aggregate helpers here.
pub mod math {
    /// Clamp `x` into `[lo, hi]`. Swapped bounds are reordered first.
    pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if x < lo {
            lo
        } else if x > hi {
            hi
        } else {
            x
        }
    }

    /// Linear interpolation from `a` to `b`. `t` is clamped to `[0, 1]`.
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        let t = clamp(t, 0.0, 1.0);
        if t <= 0.0 {
            return a;
        }
        if t >= 1.0 {
            return b;
        }
        a + (b - a) * t
    }

    /// Iterate over the finite entries of a slice.
    pub fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
        values.iter().copied().filter(|v| v.is_finite())
    }

    /// Arithmetic mean of the finite values, `None` if there are none.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let (sum, count) = finite(values).fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Sample standard deviation (n - 1 denominator) of the finite values.
    pub fn std_dev(values: &[f64]) -> Option<f64> {
        let count = finite(values).count();
        if count < 2 {
            return None;
        }
        let m = mean(values)?;
        let ss: f64 = finite(values).map(|v| (v - m) * (v - m)).sum();
        Some((ss / (count - 1) as f64).sqrt())
    }

}
