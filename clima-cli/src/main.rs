//! clima CLI - analyse a long daily climate record for one location.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "clima-cli",
    version,
    about = "Trend, smoothing, distribution and projection toolkit for daily climate records"
)]
struct Cli {
    #[command(subcommand)]
    command: clima_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("clima-cli {}", env!("CARGO_PKG_VERSION"));
    clima_cmd::run(cli.command)
}
