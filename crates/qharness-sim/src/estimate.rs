//! Expectation-value estimation from outcome histograms.

use serde::{Deserialize, Serialize};

use crate::counts::OutcomeCounts;
use crate::error::{SimError, SimResult};
use crate::observable::Observable;

/// Sample mean of an observable and its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Mean weight over all recorded shots.
    pub mean: f64,
    /// Standard error of the mean.
    pub stderr: f64,
    /// Shots the estimate is based on.
    pub shots: u64,
}

impl Estimate {
    /// True when `value` lies within `k` standard errors of the mean.
    pub fn within(&self, value: f64, k: f64) -> bool {
        (self.mean - value).abs() <= k * self.stderr
    }
}

/// Estimate `⟨O⟩` from a histogram.
///
/// The standard error is the Bessel-corrected sample standard deviation of
/// the per-shot weights divided by `sqrt(shots)`, computed directly from the
/// histogram. A single shot has zero standard error.
pub fn estimate(counts: &OutcomeCounts, observable: &impl Observable) -> SimResult<Estimate> {
    let shots = counts.total_shots();
    if shots == 0 {
        return Err(SimError::EmptyCounts);
    }
    if let Some(q) = observable.max_qubit() {
        if q >= counts.num_qubits() {
            return Err(SimError::QubitOutOfRange {
                qubit: q,
                n_qubits: counts.num_qubits(),
            });
        }
    }

    let n = shots as f64;
    let weighted: Vec<(f64, f64)> = counts
        .iter()
        .map(|(bitstring, c)| (observable.weight(bitstring), c as f64))
        .collect();

    let mean = weighted.iter().map(|(w, c)| w * c).sum::<f64>() / n;

    let stderr = if shots > 1 {
        let ss: f64 = weighted.iter().map(|(w, c)| c * (w - mean).powi(2)).sum();
        let variance = ss / (n - 1.0);
        (variance / n).sqrt()
    } else {
        0.0
    };

    Ok(Estimate {
        mean,
        stderr,
        shots,
    })
}

/// Fraction of shots that landed on `reference`.
pub fn fidelity_proxy(counts: &OutcomeCounts, reference: &str) -> SimResult<f64> {
    counts.probability(reference).ok_or(SimError::EmptyCounts)
}
