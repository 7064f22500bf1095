//! fv2d command-line interface
//!
//! Runs one simulation described by a YAML configuration file and exits
//! with 0 on completion, 2 when the run stopped on a collapsed time step.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use fv_rs::{
    CartesianGeometry, GodunovUpdate, Simulation, SimulationConfig, StabilityLimiter,
    VtkCheckpointWriter,
};

/// Explicit finite-volume solver for the 2D Euler equations
#[derive(Parser)]
#[command(name = "fv2d")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explicit finite-volume solver for the 2D Euler equations", long_about = None)]
struct Cli {
    /// Run configuration (YAML)
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = SimulationConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let grid = config.grid();
    let eos = config.eos();
    info!(
        config = %cli.config.display(),
        grid = %grid.resolution(),
        domain = %grid.bounds(),
        problem = config.problem.name(),
        boundaries = %config.mesh.boundaries,
        "configuration loaded"
    );

    let mut limiter = StabilityLimiter::new(CartesianGeometry::new(grid), eos, config.stability_params());
    let mut update = GodunovUpdate::new(grid, eos, config.mesh.boundaries);
    if let Some(kappa) = config.conductivity() {
        limiter = limiter.with_conductivity(kappa.clone());
        update = update.with_conductivity(kappa);
    }
    if let Some(mu) = config.viscosity() {
        limiter = limiter.with_viscosity(mu.clone());
        update = update.with_viscosity(mu);
    }

    let writer = VtkCheckpointWriter::new(&config.output.directory, config.output.prefix.clone(), grid)
        .with_context(|| format!("creating output directory {}", config.output.directory.display()))?;

    let mut u = config
        .problem
        .conserved(&grid, &eos, &config.mesh.boundaries, config.n_fields());

    let mut sim = Simulation::new(limiter, update, writer).with_params(config.run_params());
    let result = sim.run(&mut u).context("simulation failed")?;

    info!(
        status = %result.status,
        final_time = result.final_time,
        iterations = result.iterations,
        checkpoints = result.checkpoints_written,
        output = %sim.checkpoint().directory().display(),
        "done"
    );

    Ok(ExitCode::from(result.status.exit_code()))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(&cli)
}
