/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use reservoir_setq::config::Scenario;
use reservoir_setq::simulation::{Simulation, SimulationResults};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Reservoir SetQ scenario runner.
///
/// Example:
///   reservoir-setq --scenario demos/set_q_scenario.yaml --output results.yaml
#[derive(Debug, Parser)]
#[command(
    name = "reservoir-setq",
    about = "Run a SetQ reservoir control scenario",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML scenario file.
    #[arg(short = 'c', long = "scenario")]
    scenario: PathBuf,

    /// Write the recorded results as YAML to this file.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialise structured logging.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        scenario = %cli.scenario.display(),
        output   = ?cli.output,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("Scenario failed: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = Scenario::load_from_file(&cli.scenario)?;
    let state = scenario.build_state()?;

    let results = Simulation::new(state, scenario.schemes.clone())
        .run()
        .context("Simulation aborted")?;

    print_results(&results);

    if let Some(path) = &cli.output {
        let yaml = serde_yaml::to_string(&results).context("Failed to serialise results")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Cannot write results file: {}", path.display()))?;
        info!("Results written to: {}", path.display());
    }

    Ok(())
}

/// Log one line per step with every recorded variable.
fn print_results(results: &SimulationResults) {
    info!("Results ({} step(s)):", results.steps);
    for step in 0..results.steps {
        let row: Vec<String> = results
            .series
            .iter()
            .map(|(name, series)| match series.get(step).flatten() {
                Some(v) => format!("{name}={v:.4}"),
                None => format!("{name}=-"),
            })
            .collect();
        info!("  [{step:>4}]  {}", row.join("  "));
    }
}
