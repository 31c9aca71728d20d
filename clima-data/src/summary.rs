//! Headline statistics for the whole record: extreme days, record years,
//! the trend of a chosen index, a decade comparison table and anomalies.

use crate::aggregate::{
    annual_series, count_days_above_threshold_by_year, decadal_average, find_record_year,
    RecordYear,
};
use crate::anomaly::{anomalies, baseline_mean};
use chrono::NaiveDate;
use clima_core::{AnnualIndexSet, DailyField, DailyObservation, YearRange};
use clima_stats::regression::{fit, RegressionModel};
use clima_utils::dates::decade_label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which end of a distribution to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

/// The day holding an extreme value of a daily field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeDay {
    pub date: NaiveDate,
    pub value: f64,
}

/// Inputs that shape [`build_summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Annual index whose OLS trend is reported.
    pub trend_field: String,
    /// Annual indices whose record year is reported.
    pub record_fields: Vec<String>,
    /// Annual indices averaged per decade.
    pub decade_fields: Vec<String>,
    /// Annual field measured against the baseline.
    pub anomaly_field: String,
    pub baseline: YearRange,
    /// Daily maximum temperature threshold for the hot-day count, °C.
    pub hot_day_threshold: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            trend_field: "su30".to_string(),
            record_fields: vec!["su30".to_string(), "wsdi_days".to_string()],
            decade_fields: ["su30", "tr20", "wsdi_days", "cdd", "cwd"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            anomaly_field: "temp_mean_annual".to_string(),
            baseline: YearRange::new(1940, 1980),
            hot_day_threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSummary {
    pub hottest_day: Option<ExtremeDay>,
    pub coldest_day: Option<ExtremeDay>,
    pub wettest_day: Option<ExtremeDay>,
    pub record_years: BTreeMap<String, RecordYear>,
    pub trend_field: String,
    pub trend: RegressionModel,
    /// Decade label ("1980s") to field to mean.
    pub decade_comparison: BTreeMap<String, BTreeMap<String, f64>>,
    pub hot_day_threshold: f64,
    pub hot_days_by_year: BTreeMap<i32, usize>,
    pub anomaly_field: String,
    pub baseline: YearRange,
    pub baseline_mean: Option<f64>,
    pub anomaly_by_year: BTreeMap<i32, f64>,
}

/// The day with the largest (or smallest) value of `field`. The first such
/// day in input order wins ties; `None` when no day has the field.
pub fn extreme_day(
    records: &[DailyObservation],
    field: DailyField,
    extreme: Extreme,
) -> Option<ExtremeDay> {
    let mut best: Option<ExtremeDay> = None;
    for record in records {
        let Some(value) = record.value(field) else {
            continue;
        };
        let better = match (best, extreme) {
            (None, _) => true,
            (Some(b), Extreme::Max) => value > b.value,
            (Some(b), Extreme::Min) => value < b.value,
        };
        if better {
            best = Some(ExtremeDay {
                date: record.date,
                value,
            });
        }
    }
    best
}

/// Compute every headline figure from the daily and annual records.
pub fn build_summary(
    daily: &[DailyObservation],
    annual: &[AnnualIndexSet],
    options: &SummaryOptions,
) -> ClimateSummary {
    let record_years = options
        .record_fields
        .iter()
        .filter_map(|field| find_record_year(annual, field).map(|r| (field.clone(), r)))
        .collect();

    let series = annual_series(annual, &options.trend_field);
    let years: Vec<f64> = series.iter().map(|p| f64::from(p.year)).collect();
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let trend = fit(&years, &values);

    let mut decade_comparison: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for field in &options.decade_fields {
        for avg in decadal_average(annual, field) {
            decade_comparison
                .entry(decade_label(avg.decade))
                .or_default()
                .insert(field.clone(), avg.value);
        }
    }

    let anomaly_by_year = anomalies(annual, &options.anomaly_field, options.baseline)
        .into_iter()
        .map(|p| (p.year, p.value))
        .collect();

    let summary = ClimateSummary {
        hottest_day: extreme_day(daily, DailyField::TempMax, Extreme::Max),
        coldest_day: extreme_day(daily, DailyField::TempMin, Extreme::Min),
        wettest_day: extreme_day(daily, DailyField::Precipitation, Extreme::Max),
        record_years,
        trend_field: options.trend_field.clone(),
        trend,
        decade_comparison,
        hot_day_threshold: options.hot_day_threshold,
        hot_days_by_year: count_days_above_threshold_by_year(daily, options.hot_day_threshold),
        anomaly_field: options.anomaly_field.clone(),
        baseline: options.baseline,
        baseline_mean: baseline_mean(annual, &options.anomaly_field, options.baseline),
        anomaly_by_year,
    };

    if let Some(hot) = summary.hottest_day {
        log::info!("hottest day: {} at {:.1}°C", hot.date, hot.value);
    }
    log::info!(
        "{} trend: {:+.2} per decade (R² {:.3})",
        summary.trend_field,
        summary.trend.slope_per_decade,
        summary.trend.r_squared
    );
    summary
}
