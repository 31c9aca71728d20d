//! Command implementations for the clima CLI.
//!
//! Each subcommand loads the daily and/or annual files it needs, runs the
//! analytics core and writes the result as JSON (stdout by default).

use clap::Subcommand;

pub mod distribution;
pub mod io;
pub mod project;
pub mod summary;
pub mod trend;

#[derive(Subcommand)]
pub enum Command {
    /// Build the headline summary (extreme days, records, trend, decades, anomalies)
    Summary {
        /// Daily observations (CSV or JSON, optionally .gz)
        #[arg(short = 'd', long)]
        daily: String,

        /// Annual indices (CSV or metrics.json, optionally .gz)
        #[arg(short = 'a', long)]
        annual: String,

        /// Annual index whose trend is reported
        #[arg(long, default_value = "su30")]
        trend_field: String,

        /// Annual field compared against the baseline
        #[arg(long, default_value = "temp_mean_annual")]
        anomaly_field: String,

        /// First year of the anomaly baseline
        #[arg(long, default_value_t = 1940)]
        baseline_start: i32,

        /// Last year of the anomaly baseline
        #[arg(long, default_value_t = 1980)]
        baseline_end: i32,

        /// Hot-day threshold on daily maximum temperature (°C)
        #[arg(long, default_value_t = 30.0)]
        hot_threshold: f64,

        /// Output JSON path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Also write a gzip-compressed copy of the output
        #[arg(long)]
        gzip: bool,
    },

    /// Fit an OLS trend of one annual index against year
    Trend {
        #[arg(short = 'a', long)]
        annual: String,

        #[arg(short = 'f', long)]
        field: String,

        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Average one annual index per decade
    Decades {
        #[arg(short = 'a', long)]
        annual: String,

        #[arg(short = 'f', long)]
        field: String,

        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Project one annual index to a future year (raw and slope-anchored)
    Project {
        #[arg(short = 'a', long)]
        annual: String,

        #[arg(short = 'f', long)]
        field: String,

        /// Moving-average window width (odd)
        #[arg(short = 'w', long, default_value_t = clima_data::projection::DEFAULT_WINDOW)]
        window: usize,

        /// First year of the stable window used for the anchored slope
        #[arg(long, default_value_t = clima_data::projection::DEFAULT_STABLE_START_YEAR)]
        stable_start: i32,

        /// Last projected year
        #[arg(long, default_value_t = clima_data::projection::DEFAULT_HORIZON)]
        horizon: i32,

        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Kernel density estimate of one daily field
    Density {
        #[arg(short = 'd', long)]
        daily: String,

        /// Daily column, e.g. temp_max
        #[arg(short = 'f', long, default_value = "temp_max")]
        field: String,

        /// Restrict to these years (inclusive), e.g. 1961
        #[arg(long)]
        from_year: Option<i32>,

        #[arg(long)]
        to_year: Option<i32>,

        /// Kernel bandwidth (rule of thumb for gaussian when omitted)
        #[arg(long)]
        bandwidth: Option<f64>,

        /// Use the compact-support kernel; requires --bandwidth
        #[arg(long)]
        compact: bool,

        /// Number of evaluation points
        #[arg(long, default_value_t = clima_stats::density::DEFAULT_KDE_POINTS)]
        points: usize,

        /// Evaluation domain start (with --domain-max)
        #[arg(long, requires = "domain_max")]
        domain_min: Option<f64>,

        /// Evaluation domain end (with --domain-min)
        #[arg(long, requires = "domain_min")]
        domain_max: Option<f64>,

        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Percentiles of one daily field
    Percentile {
        #[arg(short = 'd', long)]
        daily: String,

        #[arg(short = 'f', long, default_value = "temp_max")]
        field: String,

        /// Percentiles to compute, 0-100
        #[arg(short = 'p', long, value_delimiter = ',', default_value = "10,50,90,95")]
        percentiles: Vec<f64>,

        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summary {
            daily,
            annual,
            trend_field,
            anomaly_field,
            baseline_start,
            baseline_end,
            hot_threshold,
            output,
            gzip,
        } => summary::run_summary(
            &daily,
            &annual,
            summary::SummaryArgs {
                trend_field,
                anomaly_field,
                baseline_start,
                baseline_end,
                hot_threshold,
            },
            output.as_deref(),
            gzip,
        ),
        Command::Trend {
            annual,
            field,
            output,
        } => trend::run_trend(&annual, &field, output.as_deref()),
        Command::Decades {
            annual,
            field,
            output,
        } => trend::run_decades(&annual, &field, output.as_deref()),
        Command::Project {
            annual,
            field,
            window,
            stable_start,
            horizon,
            output,
        } => project::run_project(
            &annual,
            &field,
            clima_data::ProjectionConfig {
                window,
                stable_start_year: stable_start,
                horizon,
            },
            output.as_deref(),
        ),
        Command::Density {
            daily,
            field,
            from_year,
            to_year,
            bandwidth,
            compact,
            points,
            domain_min,
            domain_max,
            output,
        } => distribution::run_density(
            &daily,
            distribution::DensityArgs {
                field,
                from_year,
                to_year,
                bandwidth,
                compact,
                points,
                domain: domain_min.zip(domain_max),
            },
            output.as_deref(),
        ),
        Command::Percentile {
            daily,
            field,
            percentiles,
            output,
        } => distribution::run_percentile(&daily, &field, &percentiles, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_density_domain_needs_both_bounds() {
        let only_min = ["clima", "density", "-d", "daily.csv", "--domain-min", "10"];
        assert!(TestCli::try_parse_from(only_min).is_err());
        let only_max = ["clima", "density", "-d", "daily.csv", "--domain-max", "40"];
        assert!(TestCli::try_parse_from(only_max).is_err());

        let both = [
            "clima", "density", "-d", "daily.csv", "--domain-min", "10", "--domain-max", "40",
        ];
        match TestCli::try_parse_from(both).unwrap().command {
            Command::Density {
                domain_min,
                domain_max,
                ..
            } => assert_eq!(domain_min.zip(domain_max), Some((10.0, 40.0))),
            _ => panic!("expected density command"),
        }
    }
}
