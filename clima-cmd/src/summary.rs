//! `summary` subcommand.

use crate::io::{load_annual, load_daily, write_json};
use clima_core::YearRange;
use clima_data::summary::{build_summary, SummaryOptions};
use log::info;

/// The user-tunable parts of [`SummaryOptions`].
pub struct SummaryArgs {
    pub trend_field: String,
    pub anomaly_field: String,
    pub baseline_start: i32,
    pub baseline_end: i32,
    pub hot_threshold: f64,
}

impl SummaryArgs {
    pub fn to_options(&self) -> SummaryOptions {
        let mut options = SummaryOptions {
            trend_field: self.trend_field.clone(),
            anomaly_field: self.anomaly_field.clone(),
            baseline: YearRange::new(self.baseline_start, self.baseline_end),
            hot_day_threshold: self.hot_threshold,
            ..Default::default()
        };
        if !options.record_fields.contains(&options.trend_field) {
            options.record_fields.push(options.trend_field.clone());
        }
        options
    }
}

/// Load both record sets and write the headline summary.
pub fn run_summary(
    daily_path: &str,
    annual_path: &str,
    args: SummaryArgs,
    output: Option<&str>,
    compress: bool,
) -> anyhow::Result<()> {
    let daily = load_daily(daily_path)?;
    let annual = load_annual(annual_path)?;
    let options = args.to_options();
    if options.baseline.is_empty() {
        anyhow::bail!(
            "baseline start {} is after baseline end {}",
            options.baseline.start,
            options.baseline.end
        );
    }

    info!(
        "Summarising {} days and {} years (baseline {}-{})",
        daily.len(),
        annual.len(),
        options.baseline.start,
        options.baseline.end
    );
    let summary = build_summary(&daily, &annual, &options);
    write_json(output, &summary, compress)
}
