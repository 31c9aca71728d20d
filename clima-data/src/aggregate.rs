//! Grouping, filtering and per-decade aggregation of climate records.
//!
//! All functions borrow their input and never reorder it: buckets keep the
//! encounter order of the records they hold.

use clima_core::{AnnualIndexSet, DailyField, DailyObservation, YearKeyed};
use clima_utils::dates::decade_of;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A `(year, value)` pair extracted from an annual field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Mean of one annual field over the years of a decade that have it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecadeAverage {
    pub decade: i32,
    pub value: f64,
    /// Number of years that contributed.
    pub years: usize,
}

/// The year holding the largest value of an annual field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordYear {
    pub year: i32,
    pub value: f64,
}

/// Bucket records by calendar year.
pub fn group_by_year<T: YearKeyed>(records: &[T]) -> BTreeMap<i32, Vec<&T>> {
    let mut result: BTreeMap<i32, Vec<&T>> = BTreeMap::new();
    for record in records {
        result.entry(record.year()).or_default().push(record);
    }
    result
}

/// Bucket records by decade (`floor(year / 10) * 10`).
pub fn group_by_decade<T: YearKeyed>(records: &[T]) -> BTreeMap<i32, Vec<&T>> {
    let mut result: BTreeMap<i32, Vec<&T>> = BTreeMap::new();
    for record in records {
        result.entry(decade_of(record.year())).or_default().push(record);
    }
    result
}

/// Records falling in `year`.
pub fn filter_by_year<T: YearKeyed>(records: &[T], year: i32) -> Vec<&T> {
    records.iter().filter(|r| r.year() == year).collect()
}

/// Records with `start <= year <= end`. An inverted range matches nothing.
pub fn filter_by_year_range<T: YearKeyed>(records: &[T], start: i32, end: i32) -> Vec<&T> {
    records
        .iter()
        .filter(|r| start <= r.year() && r.year() <= end)
        .collect()
}

/// Number of days whose maximum temperature is at or above `threshold`.
/// Days with a missing maximum are not counted.
pub fn count_days_above_threshold(records: &[DailyObservation], threshold: f64) -> usize {
    records
        .iter()
        .filter(|r| {
            r.value(DailyField::TempMax)
                .is_some_and(|t| t >= threshold)
        })
        .count()
}

/// Threshold count per calendar year, e.g. hot days per year.
pub fn count_days_above_threshold_by_year(
    records: &[DailyObservation],
    threshold: f64,
) -> BTreeMap<i32, usize> {
    group_by_year(records)
        .into_iter()
        .map(|(year, days)| {
            let count = days
                .iter()
                .filter(|r| r.value(DailyField::TempMax).is_some_and(|t| t >= threshold))
                .count();
            (year, count)
        })
        .collect()
}

/// The `(year, value)` series of one annual field, skipping years where it
/// is missing. Order follows the input.
pub fn annual_series(records: &[AnnualIndexSet], field: &str) -> Vec<YearValue> {
    records
        .iter()
        .filter_map(|r| r.get(field).map(|value| YearValue { year: r.year, value }))
        .collect()
}

/// Mean of `field` for each decade, ascending by decade.
///
/// Years without a numeric value are skipped; a decade with no contributing
/// year is left out rather than reported as zero.
pub fn decadal_average(records: &[AnnualIndexSet], field: &str) -> Vec<DecadeAverage> {
    group_by_decade(records)
        .into_iter()
        .filter_map(|(decade, sets)| {
            let values: Vec<f64> = sets.iter().filter_map(|s| s.get(field)).collect();
            if values.is_empty() {
                return None;
            }
            Some(DecadeAverage {
                decade,
                value: values.iter().sum::<f64>() / values.len() as f64,
                years: values.len(),
            })
        })
        .collect()
}

/// The year with the largest value of `field`; the earliest such year in
/// input order on ties.
///
/// Returns `None` when no record has the field. Unlike the percentile
/// sentinel this never falls back to a number, because a default year or a
/// zero would read as a real record.
pub fn find_record_year(records: &[AnnualIndexSet], field: &str) -> Option<RecordYear> {
    let mut best: Option<RecordYear> = None;
    for record in records {
        if let Some(value) = record.get(field) {
            match best {
                Some(b) if b.value >= value => {}
                _ => best = Some(RecordYear { year: record.year, value }),
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, tmax: Option<f64>) -> DailyObservation {
        let mut obs = DailyObservation::empty(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        obs.temp_max = tmax;
        obs
    }

    fn su30_sets() -> Vec<AnnualIndexSet> {
        vec![
            AnnualIndexSet::new(2020).with_field("su30", 100.0),
            AnnualIndexSet::new(2021).with_field("su30", 120.0),
            AnnualIndexSet::new(2022).with_field("su30", 80.0),
        ]
    }

    #[test]
    fn test_count_days_threshold_inclusive() {
        let maxima = [35.0, 33.0, 32.0, 30.0, 30.0, 28.0, 25.0, 22.0];
        let records: Vec<DailyObservation> = maxima
            .iter()
            .enumerate()
            .map(|(i, &t)| day(2020, 1, i as u32 + 1, Some(t)))
            .collect();
        assert_eq!(count_days_above_threshold(&records, 30.0), 5);
    }

    #[test]
    fn test_count_days_skips_missing() {
        let records = vec![day(2020, 1, 1, None), day(2020, 1, 2, Some(31.0))];
        assert_eq!(count_days_above_threshold(&records, 30.0), 1);
        assert_eq!(count_days_above_threshold(&[], 30.0), 0);
    }

    #[test]
    fn test_count_by_year() {
        let records = vec![
            day(1999, 12, 31, Some(31.0)),
            day(2000, 1, 1, Some(29.0)),
            day(2000, 1, 2, Some(30.0)),
        ];
        let counts = count_days_above_threshold_by_year(&records, 30.0);
        assert_eq!(counts[&1999], 1);
        assert_eq!(counts[&2000], 1);
    }

    #[test]
    fn test_group_by_year_preserves_order() {
        let records = vec![
            day(2001, 3, 1, Some(1.0)),
            day(2000, 1, 1, Some(2.0)),
            day(2001, 1, 1, Some(3.0)),
        ];
        let grouped = group_by_year(&records);
        assert_eq!(grouped.len(), 2);
        let y2001: Vec<f64> = grouped[&2001].iter().filter_map(|r| r.temp_max).collect();
        assert_eq!(y2001, vec![1.0, 3.0]);
    }

    #[test]
    fn test_group_by_decade() {
        let sets = vec![
            AnnualIndexSet::new(1985),
            AnnualIndexSet::new(1980),
            AnnualIndexSet::new(1990),
            AnnualIndexSet::new(1989),
        ];
        let grouped = group_by_decade(&sets);
        let years_1980: Vec<i32> = grouped[&1980].iter().map(|s| s.year).collect();
        assert_eq!(years_1980, vec![1985, 1980, 1989]);
        assert_eq!(grouped[&1990].len(), 1);
    }

    #[test]
    fn test_filters_are_inclusive() {
        let sets: Vec<AnnualIndexSet> = (1958..=1993).map(AnnualIndexSet::new).collect();
        let baseline = filter_by_year_range(&sets, 1961, 1990);
        assert_eq!(baseline.len(), 30);
        assert_eq!(baseline[0].year, 1961);
        assert_eq!(baseline[29].year, 1990);
        assert!(filter_by_year_range(&sets, 1990, 1961).is_empty());
        assert_eq!(filter_by_year(&sets, 1970).len(), 1);
        assert!(filter_by_year(&sets, 2050).is_empty());
    }

    #[test]
    fn test_decadal_average() {
        let averages = decadal_average(&su30_sets(), "su30");
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].decade, 2020);
        assert!((averages[0].value - 100.0).abs() < 1e-12);
        assert_eq!(averages[0].years, 3);
    }

    #[test]
    fn test_decadal_average_omits_empty_decades() {
        let mut sets = su30_sets();
        sets.push(AnnualIndexSet::new(2011).with_field("tr20", 5.0));
        sets.push(AnnualIndexSet::new(2035));
        let averages = decadal_average(&sets, "su30");
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].decade, 2020);
    }

    #[test]
    fn test_find_record_year() {
        let record = find_record_year(&su30_sets(), "su30");
        assert_eq!(record, Some(RecordYear { year: 2021, value: 120.0 }));
        assert_eq!(find_record_year(&[], "su30"), None);
        assert_eq!(find_record_year(&su30_sets(), "tr20"), None);
    }

    #[test]
    fn test_find_record_year_first_wins_on_tie() {
        let sets = vec![
            AnnualIndexSet::new(1950).with_field("cdd", 40.0),
            AnnualIndexSet::new(1963).with_field("cdd", 40.0),
        ];
        assert_eq!(find_record_year(&sets, "cdd").map(|r| r.year), Some(1950));
    }

    #[test]
    fn test_annual_series_skips_missing() {
        let mut sets = su30_sets();
        sets.insert(1, AnnualIndexSet::new(2019));
        let series = annual_series(&sets, "su30");
        assert_eq!(series.len(), 3);
        assert_eq!(series[1], YearValue { year: 2021, value: 120.0 });
    }
}
