//! Lattice CLI - offline toolkit for the Lattice transaction codec.

pub mod commands;

use clap::Parser;
use colored::Colorize;

fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();
    let config = commands::resolve_config(&cli)?;

    let level = if cli.verbose {
        config.log_level.as_str()
    } else {
        "warn"
    };
    lattice_core::init_telemetry(level, config.json_logs)?;
    tracing::debug!(chain_id = config.chain_id, curve = %config.curve, "configuration loaded");

    if let Err(e) = commands::execute(cli.command, &config) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }

    Ok(())
}
