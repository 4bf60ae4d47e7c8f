use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smart_water_saver::cli::{self, Cli};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("smart_water_saver=info".parse()?))
        .init();

    let cli = Cli::parse();
    let command = format!("{:?}", cli.command);
    info!("Smart Water Saver starting");

    cli::run(cli).with_context(|| format!("command failed: {command}"))?;
    Ok(())
}
