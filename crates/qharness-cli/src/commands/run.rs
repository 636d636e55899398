//! Run command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use qharness_sim::ansatz::{LayeredAnsatz, SeededAngles};
use qharness_sim::{Sampler, SimError, inject};

use super::common::RunReport;
use crate::config::{ConfigError, ReportFormat, RunConfig};

/// Flags for `qharness run`. Anything left unset falls back to the config
/// file, then to built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Number of qubits
    #[arg(short = 'n', long)]
    pub qubits: Option<u32>,

    /// Number of ansatz layers
    #[arg(short, long)]
    pub layers: Option<u32>,

    /// Number of shots
    #[arg(short, long)]
    pub shots: Option<u64>,

    /// Depolarizing probability applied after every rotation gate
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub noise: Option<f64>,

    /// Base seed for angles and sampling (random if omitted)
    #[arg(long, env = "QHARNESS_SEED")]
    pub seed: Option<u64>,

    /// Sampling worker threads
    #[arg(short, long, env = "QHARNESS_THREADS")]
    pub threads: Option<usize>,

    /// Upper bound on --shots
    #[arg(long)]
    pub max_shots: Option<u64>,

    /// Upper bound on --qubits
    #[arg(long)]
    pub max_qubits: Option<u32>,

    /// Upper bound on the gates the ansatz may emit
    #[arg(long)]
    pub max_gates: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// YAML run file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Merge flags over the config file (if any) over defaults.
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(qubits) = self.qubits {
            config.qubits = qubits;
        }
        if let Some(layers) = self.layers {
            config.layers = layers;
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(noise) = self.noise {
            config.noise = noise;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(max_shots) = self.max_shots {
            config.max_shots = max_shots;
        }
        if let Some(max_qubits) = self.max_qubits {
            config.max_qubits = max_qubits;
        }
        if let Some(max_gates) = self.max_gates {
            config.max_gates = max_gates;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = args.resolve()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let text = config.format == ReportFormat::Text;

    info!(
        qubits = config.qubits,
        layers = config.layers,
        shots = config.shots,
        noise = config.noise,
        seed,
        "starting run"
    );

    if text {
        eprintln!(
            "{} {} qubits, {} layers, {} shots, p = {}",
            style("→").cyan().bold(),
            style(config.qubits).green(),
            style(config.layers).green(),
            style(config.shots).yellow(),
            style(config.noise).yellow(),
        );
    }

    let circuit = LayeredAnsatz::new(config.qubits, config.layers)
        .with_max_qubits(config.max_qubits)
        .with_max_gates(config.max_gates)
        .build(&mut SeededAngles::new(seed))?;
    let (noisy, noise) = inject(&circuit, config.noise)?;
    let reference = Sampler::reference_bitstring(&noisy);

    let cancel = Arc::new(AtomicBool::new(false));
    let sampler = Sampler::new(seed)
        .with_threads(config.threads)
        .with_max_shots(config.max_shots)
        .with_cancel_flag(Arc::clone(&cancel));

    let spinner = if text {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Sampling {} shots...", config.shots));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let shots = config.shots;
    let circuit_for_worker = noisy.clone();
    let mut handle =
        tokio::task::spawn_blocking(move || sampler.sample(&circuit_for_worker, &noise, shots));

    let outcome = tokio::select! {
        joined = &mut handle => joined.context("sampling task failed")?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("interrupt received, stopping sampling");
            cancel.store(true, Ordering::Relaxed);
            handle.await.context("sampling task failed")?
        }
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match outcome {
        Ok(counts) => {
            let report = RunReport::build(&config, seed, &noisy, &counts, &reference)?;
            println!("{}", report.render(config.format)?.trim_end());
            Ok(())
        }
        Err(SimError::CancelledSampling { partial }) => {
            // Report what was gathered, then still fail the run.
            if !partial.is_empty() {
                let report = RunReport::build(&config, seed, &noisy, &partial, &reference)?;
                println!("{}", report.render(config.format)?.trim_end());
            }
            Err(SimError::CancelledSampling { partial }.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_defaults() {
        let config = RunArgs::default().resolve().unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "qubits: 7\nlayers: 3\nshots: 20").unwrap();

        let args = RunArgs {
            layers: Some(1),
            config: Some(file.path().to_path_buf()),
            ..RunArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.qubits, 7);
        assert_eq!(config.layers, 1);
        assert_eq!(config.shots, 20);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let args = RunArgs {
            threads: Some(0),
            ..RunArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
