//! `project` subcommand.

use crate::io::{load_annual, write_json};
use clima_data::aggregate::annual_series;
use clima_data::projection::{project, ProjectionConfig};
use log::{info, warn};

pub fn run_project(
    annual_path: &str,
    field: &str,
    config: ProjectionConfig,
    output: Option<&str>,
) -> anyhow::Result<()> {
    if config.window % 2 == 0 {
        warn!(
            "window {} is even; it will span {} years",
            config.window,
            config.window + 1
        );
    }
    let annual = load_annual(annual_path)?;
    let history = annual_series(&annual, field);
    info!(
        "Projecting {} ({} years of history) to {} with a {}-year window from {}",
        field,
        history.len(),
        config.horizon,
        config.window,
        config.stable_start_year
    );
    let projection = project(&history, &config);
    if let (Some(year), Some(value)) = (projection.anchor_year, projection.anchor_value) {
        info!("Anchored at {} = {:.2}", year, value);
    }
    write_json(output, &projection, false)
}
