//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use qharness_ir::Circuit;
use qharness_sim::{OutcomeCounts, SimResult, ZString, estimate, fidelity_proxy};

use crate::config::{ReportFormat, RunConfig};

/// Summary of one `run` invocation.
///
/// Every number here is derived from the sampled counts; nothing is
/// filled in from constants.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub qubits: u32,
    pub layers: u32,
    pub seed: u64,
    pub noise_p: f64,
    pub shots: u64,
    pub requested_shots: u64,
    pub complete: bool,
    pub gates: BTreeMap<String, usize>,
    pub depth: usize,
    pub mean: f64,
    pub stderr: f64,
    pub reference: String,
    pub fidelity_proxy: f64,
    pub counts: BTreeMap<String, u64>,
    /// Histogram by descending count, for text output.
    #[serde(skip)]
    pub ranked: Vec<(String, u64)>,
}

impl RunReport {
    /// Estimate global Z-parity and the fidelity proxy from `counts`.
    ///
    /// `circuit` is the sampled (noise-injected) circuit and `reference`
    /// its noiseless outcome.
    pub fn build(
        config: &RunConfig,
        seed: u64,
        circuit: &Circuit,
        counts: &OutcomeCounts,
        reference: &str,
    ) -> SimResult<Self> {
        let parity = estimate(counts, &ZString::parity())?;
        let fidelity = fidelity_proxy(counts, reference)?;

        Ok(Self {
            qubits: config.qubits,
            layers: config.layers,
            seed,
            noise_p: config.noise,
            shots: parity.shots,
            requested_shots: counts.requested_shots(),
            complete: counts.is_complete(),
            gates: circuit
                .count_ops()
                .into_iter()
                .map(|(name, n)| (name.to_string(), n))
                .collect(),
            depth: circuit.depth(),
            mean: parity.mean,
            stderr: parity.stderr,
            reference: reference.to_string(),
            fidelity_proxy: fidelity,
            counts: counts.as_map().clone(),
            ranked: counts
                .sorted()
                .into_iter()
                .map(|(bitstring, n)| (bitstring.to_string(), n))
                .collect(),
        })
    }

    /// Render as `key: value` lines followed by the full histogram,
    /// most frequent outcome first.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let gates = self
            .gates
            .iter()
            .map(|(name, n)| format!("{name}={n}"))
            .collect::<Vec<_>>()
            .join(" ");

        // Writing to a String cannot fail.
        let _ = writeln!(out, "qubits: {}", self.qubits);
        let _ = writeln!(out, "layers: {}", self.layers);
        let _ = writeln!(out, "seed: {}", self.seed);
        let _ = writeln!(out, "noise_p: {}", self.noise_p);
        let _ = writeln!(out, "shots: {}", self.shots);
        let _ = writeln!(out, "requested_shots: {}", self.requested_shots);
        let _ = writeln!(out, "complete: {}", self.complete);
        let _ = writeln!(out, "gates: {gates}");
        let _ = writeln!(out, "depth: {}", self.depth);
        let _ = writeln!(out, "mean: {:.6}", self.mean);
        let _ = writeln!(out, "stderr: {:.6}", self.stderr);
        let _ = writeln!(out, "reference: {}", self.reference);
        let _ = writeln!(out, "fidelity_proxy: {:.6}", self.fidelity_proxy);
        let _ = writeln!(out, "counts:");

        for (bitstring, count) in &self.ranked {
            let _ = writeln!(out, "  {bitstring}: {count}");
        }
        out
    }

    /// Render in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
