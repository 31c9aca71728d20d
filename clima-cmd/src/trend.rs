//! `trend` and `decades` subcommands.

use crate::io::{load_annual, write_json};
use clima_core::AnnualIndexSet;
use clima_data::aggregate::{annual_series, decadal_average, find_record_year, RecordYear};
use clima_stats::regression::{fit, RegressionModel};
use clima_utils::dates::decade_label;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TrendReport {
    pub field: String,
    pub years: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub model: RegressionModel,
    pub record: Option<RecordYear>,
}

#[derive(Debug, Serialize)]
pub struct DecadeRow {
    pub decade: String,
    pub value: f64,
    pub years: usize,
}

/// Regression of `field` against year, plus its record year.
pub fn trend_report(annual: &[AnnualIndexSet], field: &str) -> TrendReport {
    let series = annual_series(annual, field);
    let years: Vec<f64> = series.iter().map(|p| f64::from(p.year)).collect();
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    TrendReport {
        field: field.to_string(),
        years: series.len(),
        first_year: series.first().map(|p| p.year),
        last_year: series.last().map(|p| p.year),
        model: fit(&years, &values),
        record: find_record_year(annual, field),
    }
}

pub fn run_trend(annual_path: &str, field: &str, output: Option<&str>) -> anyhow::Result<()> {
    let annual = load_annual(annual_path)?;
    let report = trend_report(&annual, field);
    if report.years == 0 {
        warn!("No values for {} in {}", field, annual_path);
    }
    info!(
        "{}: {:+.3} per decade over {} years (R² {:.3})",
        field, report.model.slope_per_decade, report.years, report.model.r_squared
    );
    write_json(output, &report, false)
}

pub fn decade_rows(annual: &[AnnualIndexSet], field: &str) -> Vec<DecadeRow> {
    decadal_average(annual, field)
        .into_iter()
        .map(|avg| DecadeRow {
            decade: decade_label(avg.decade),
            value: avg.value,
            years: avg.years,
        })
        .collect()
}

pub fn run_decades(annual_path: &str, field: &str, output: Option<&str>) -> anyhow::Result<()> {
    let annual = load_annual(annual_path)?;
    let rows = decade_rows(&annual, field);
    for row in &rows {
        info!("  {}: {:.1} ({} years)", row.decade, row.value, row.years);
    }
    write_json(output, &rows, false)
}
