//! qharness command-line interface.
//!
//! Builds a seeded layered ansatz, injects depolarizing noise, samples it
//! and reports the global Z-parity estimate.
//!
//! Exit codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Invalid parameter, malformed arguments or unusable config |
//! | 2 | Simulation failure (cancelled sampling, empty counts) |

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::run::RunArgs;
use commands::{run, version};
use config::ConfigError;
use qharness_sim::SimError;

const EXIT_INVALID_PARAMETER: u8 = 1;
const EXIT_SIMULATION_FAILURE: u8 = 2;

/// qharness - seeded ansatz construction and noisy shot sampling
#[derive(Debug, Parser)]
#[command(name = "qharness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build, inject, sample and estimate
    Run(RunArgs),

    /// Show version information
    Version,
}

/// Map a command failure to its process exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(sim) = err.downcast_ref::<SimError>() {
        return if sim.is_invalid_parameter() {
            EXIT_INVALID_PARAMETER
        } else {
            EXIT_SIMULATION_FAILURE
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_INVALID_PARAMETER;
    }
    EXIT_SIMULATION_FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_INVALID_PARAMETER)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // RUST_LOG wins over -v
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}
