//! Deviation of annual values from a baseline-period mean.
//!
//! The baseline is always passed in; nothing here assumes a fixed period.

use crate::aggregate::{filter_by_year_range, YearValue};
use clima_core::{AnnualIndexSet, YearRange};

/// Mean of `field` over the years of `baseline` that have it.
pub fn baseline_mean(records: &[AnnualIndexSet], field: &str, baseline: YearRange) -> Option<f64> {
    let values: Vec<f64> = filter_by_year_range(records, baseline.start, baseline.end)
        .into_iter()
        .filter_map(|r| r.get(field))
        .collect();
    log::debug!(
        "baseline {}-{}: {} of {} years have {}",
        baseline.start,
        baseline.end,
        values.len(),
        baseline.len(),
        field
    );
    clima_utils::math::mean(&values)
}

/// `value - baseline mean` for every year that has `field`.
///
/// Empty when the baseline period holds no values for `field`.
pub fn anomalies(records: &[AnnualIndexSet], field: &str, baseline: YearRange) -> Vec<YearValue> {
    let Some(reference) = baseline_mean(records, field, baseline) else {
        log::warn!(
            "no {} values in baseline {}-{}",
            field,
            baseline.start,
            baseline.end
        );
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|r| {
            r.get(field).map(|v| YearValue {
                year: r.year,
                value: v - reference,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temps() -> Vec<AnnualIndexSet> {
        vec![
            AnnualIndexSet::new(1940).with_field("temp_mean_annual", 20.0),
            AnnualIndexSet::new(1950).with_field("temp_mean_annual", 21.0),
            AnnualIndexSet::new(1960),
            AnnualIndexSet::new(1990).with_field("temp_mean_annual", 22.5),
            AnnualIndexSet::new(2020).with_field("temp_mean_annual", 23.0),
        ]
    }

    #[test]
    fn test_baseline_mean() {
        let mean = baseline_mean(&temps(), "temp_mean_annual", YearRange::new(1940, 1980));
        assert_eq!(mean, Some(20.5));
        assert_eq!(
            baseline_mean(&temps(), "temp_mean_annual", YearRange::new(1800, 1900)),
            None
        );
    }

    #[test]
    fn test_anomalies_against_explicit_baseline() {
        let out = anomalies(&temps(), "temp_mean_annual", YearRange::new(1940, 1980));
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], YearValue { year: 1940, value: -0.5 });
        assert_eq!(out[3], YearValue { year: 2020, value: 2.5 });

        let other = anomalies(&temps(), "temp_mean_annual", YearRange::new(1990, 2020));
        assert_eq!(other[3].value, 0.25);
    }

    #[test]
    fn test_anomalies_without_baseline_data() {
        assert!(anomalies(&temps(), "temp_mean_annual", YearRange::new(2030, 2040)).is_empty());
    }
}
