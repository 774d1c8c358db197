//! Binary entry point: `parflock [config_path]`.
//!
//! A single positional, optional argument: this crate drives one pipeline
//! stage (simulate), so there's no subcommand to select. Mirrors a
//! minimal `main`: seed the PRNG, parse the parameter file, run the
//! simulation, dump the tracer.

use clap::Parser;
use flocking_lib::config::{EngineConfig, EngineContext};
use flocking_lib::simulator::Simulator;
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "./params/params.toml";

/// A parallel, agent-based flocking simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config_path: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match EngineConfig::load(&cli.config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let ctx = match EngineContext::new(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // `num_threads = 0` means "sweep a built-in schedule":
    // run the same configuration once per entry in a small built-in
    // schedule, logging each run's tracer summary, so a caller can compare
    // thread counts without hand-editing the config file between runs.
    let schedule: Vec<usize> = if ctx.config.num_threads == 0 {
        [1, 2, 4, 8]
            .into_iter()
            .filter(|&n| n <= std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .collect()
    } else {
        vec![ctx.config.num_threads]
    };
    let schedule = if schedule.is_empty() { vec![1] } else { schedule };

    let mut last_tracer_dump = Vec::new();
    for num_threads in schedule {
        let mut run_ctx = ctx.clone();
        run_ctx.config.num_threads = num_threads;

        let mut simulator = Simulator::new(run_ctx);
        simulator.simulate();

        last_tracer_dump.clear();
        if let Err(err) = simulator.tracer().dump(&mut last_tracer_dump) {
            log::error!("failed to dump tracer output: {err}");
        }
    }

    if let Err(err) = std::io::Write::write_all(&mut std::io::stdout(), &last_tracer_dump) {
        log::error!("failed to write tracer output to stdout: {err}");
    }

    ExitCode::SUCCESS
}
