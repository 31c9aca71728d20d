//! `density` and `percentile` subcommands over one daily field.

use crate::io::{load_daily, write_json};
use clima_core::{DailyField, DailyObservation};
use clima_data::aggregate::filter_by_year_range;
use clima_stats::density::{
    epanechnikov_kde, evenly_spaced, gaussian_kde, rule_of_thumb_bandwidth, DensityPoint,
    GaussianKdeOptions,
};
use clima_stats::percentile::percentiles;
use log::info;
use serde::Serialize;

pub struct DensityArgs {
    pub field: String,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub bandwidth: Option<f64>,
    pub compact: bool,
    pub points: usize,
    pub domain: Option<(f64, f64)>,
}

#[derive(Debug, Serialize)]
pub struct PercentileRow {
    pub p: f64,
    pub value: Option<f64>,
}

fn parse_field(name: &str) -> anyhow::Result<DailyField> {
    DailyField::from_column(name).ok_or_else(|| {
        let known: Vec<&str> = DailyField::ALL.iter().map(|f| f.column()).collect();
        anyhow::anyhow!("unknown daily field {name:?}; expected one of {}", known.join(", "))
    })
}

/// Finite values of `field` for days within the optional year bounds.
pub fn field_sample(
    records: &[DailyObservation],
    field: DailyField,
    from_year: Option<i32>,
    to_year: Option<i32>,
) -> Vec<f64> {
    filter_by_year_range(
        records,
        from_year.unwrap_or(i32::MIN),
        to_year.unwrap_or(i32::MAX),
    )
    .into_iter()
    .filter_map(|r| r.value(field))
    .collect()
}

/// Density curve for `sample` following the CLI options.
pub fn density_curve(sample: &[f64], args: &DensityArgs) -> anyhow::Result<Vec<DensityPoint>> {
    if !args.compact {
        return Ok(gaussian_kde(
            sample,
            GaussianKdeOptions {
                bandwidth: args.bandwidth,
                domain: args.domain,
                points: args.points,
            },
        ));
    }

    let Some(h) = args.bandwidth else {
        anyhow::bail!("--compact needs an explicit --bandwidth");
    };
    if sample.is_empty() {
        return Ok(Vec::new());
    }
    let (lo, hi) = match args.domain {
        Some(domain) => domain,
        None => {
            let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
            let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min - h, max + h)
        }
    };
    Ok(epanechnikov_kde(sample, h, &evenly_spaced(lo, hi, args.points)))
}

pub fn run_density(daily_path: &str, args: DensityArgs, output: Option<&str>) -> anyhow::Result<()> {
    let field = parse_field(&args.field)?;
    let daily = load_daily(daily_path)?;
    let sample = field_sample(&daily, field, args.from_year, args.to_year);
    info!(
        "Density of {} over {} days (bandwidth {:.3}{})",
        field.column(),
        sample.len(),
        args.bandwidth.unwrap_or_else(|| rule_of_thumb_bandwidth(&sample)),
        if args.compact { ", compact kernel" } else { "" }
    );
    let curve = density_curve(&sample, &args)?;
    write_json(output, &curve, false)
}

pub fn run_percentile(
    daily_path: &str,
    field: &str,
    ps: &[f64],
    output: Option<&str>,
) -> anyhow::Result<()> {
    let field = parse_field(field)?;
    let daily = load_daily(daily_path)?;
    let sample = field_sample(&daily, field, None, None);
    let rows: Vec<PercentileRow> = ps
        .iter()
        .zip(percentiles(&sample, ps))
        .map(|(&p, value)| PercentileRow { p, value })
        .collect();
    for row in &rows {
        match row.value {
            Some(v) => info!("  p{}: {:.1}", row.p, v),
            None => info!("  p{}: no data", row.p),
        }
    }
    write_json(output, &rows, false)
}
