//! Shot sampler for noisy layered circuits.
//!
//! This is a classical bit-flip trajectory model, not a statevector
//! simulator. Every qubit carries one classical bit, starting at 0:
//!
//! - `Rx(θ)` / `Ry(θ)` toggle the bit when the rotation's half-turn count
//!   `round(θ / π)` is odd, so the net rotation parity decides the basis state
//! - `CX` XORs the control bit into the target
//! - `H` leaves the bit unchanged
//!
//! After each gate whose name carries an error rate `p` in the
//! [`NoiseSpec`], every qubit the gate touched flips with probability `p`.
//! Superposition and phase are not modelled; the counts it produces are only
//! as meaningful as this model, and no fidelity figure is derived from
//! anything but those counts.
//!
//! Each shot draws from its own ChaCha8 stream: the base seed picks the key
//! and the shot index picks the stream, so a run is reproducible for a given
//! seed regardless of thread count.

use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

use qharness_ir::{Circuit, NoiseSpec, StandardGate};

use crate::counts::OutcomeCounts;
use crate::error::{SimError, SimResult};

/// Default upper bound on shots per run.
pub const DEFAULT_MAX_SHOTS: u64 = 10_000_000;

/// One step of the compiled trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Deterministic bit flip from an odd half-turn rotation.
    Toggle(usize),
    /// Classical CNOT.
    Cnot { control: usize, target: usize },
    /// Random flip with probability `p`.
    Noise { qubit: usize, p: f64 },
}

/// A circuit lowered to the bit-flip model.
#[derive(Debug, Clone)]
struct TrajectoryPlan {
    n_qubits: usize,
    steps: Vec<Step>,
}

impl TrajectoryPlan {
    fn compile(circuit: &Circuit, noise: &NoiseSpec) -> Self {
        let mut steps = Vec::with_capacity(circuit.num_ops() * 2);

        for inst in circuit.instructions() {
            match inst.gate {
                StandardGate::Rx(theta) | StandardGate::Ry(theta) => {
                    if odd_half_turns(theta) {
                        steps.push(Step::Toggle(inst.qubits[0].index()));
                    }
                }
                StandardGate::CX => steps.push(Step::Cnot {
                    control: inst.qubits[0].index(),
                    target: inst.qubits[1].index(),
                }),
                StandardGate::H => {}
            }

            if let Some(p) = noise.gate_error(inst.name()) {
                if p > 0.0 {
                    for q in &inst.qubits {
                        steps.push(Step::Noise { qubit: q.index(), p });
                    }
                }
            }
        }

        Self {
            n_qubits: circuit.num_qubits(),
            steps,
        }
    }

    fn is_deterministic(&self) -> bool {
        !self.steps.iter().any(|s| matches!(s, Step::Noise { .. }))
    }

    fn run<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        let mut bits = vec![false; self.n_qubits];
        for step in &self.steps {
            match *step {
                Step::Toggle(q) => bits[q] = !bits[q],
                Step::Cnot { control, target } => {
                    if bits[control] {
                        bits[target] = !bits[target];
                    }
                }
                Step::Noise { qubit, p } => {
                    let u: f64 = rng.r#gen();
                    if u < p {
                        bits[qubit] = !bits[qubit];
                    }
                }
            }
        }
        bits
    }
}

/// True when `round(theta / π)` is odd.
fn odd_half_turns(theta: f64) -> bool {
    ((theta / PI).round() as i64).rem_euclid(2) == 1
}

/// Generator for a single shot, independent of scheduling.
fn shot_rng(seed: u64, shot: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(shot);
    rng
}

fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Samples measurement outcomes from a noisy circuit.
#[derive(Debug, Clone)]
pub struct Sampler {
    seed: u64,
    threads: usize,
    max_shots: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl Sampler {
    /// Single-threaded sampler with the given base seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            threads: 1,
            max_shots: DEFAULT_MAX_SHOTS,
            cancel: None,
        }
    }

    /// Spread shots over `threads` workers (values below 1 mean 1).
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Override the shot bound.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u64) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Stop between shots once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Outcome of the circuit with every noise event suppressed.
    pub fn reference_bitstring(circuit: &Circuit) -> String {
        let plan = TrajectoryPlan::compile(circuit, &NoiseSpec::noiseless());
        // Noiseless plans never consult the generator.
        let bits = plan.run(&mut shot_rng(0, 0));
        bits_to_string(&bits)
    }

    /// Run `shots` independent shots.
    ///
    /// Returns [`SimError::CancelledSampling`] with the partial histogram if
    /// the cancel flag is raised before every shot has run.
    #[instrument(skip(self, circuit, noise), fields(n_qubits = circuit.num_qubits(), seed = self.seed))]
    pub fn sample(
        &self,
        circuit: &Circuit,
        noise: &NoiseSpec,
        shots: u64,
    ) -> SimResult<OutcomeCounts> {
        if shots == 0 || shots > self.max_shots {
            return Err(SimError::InvalidShots {
                shots,
                max: self.max_shots,
            });
        }

        let start = Instant::now();
        let plan = TrajectoryPlan::compile(circuit, noise);
        debug!(
            steps = plan.steps.len(),
            threads = self.threads,
            deterministic = plan.is_deterministic(),
            "starting sampling"
        );

        let counts = if plan.is_deterministic() {
            self.sample_deterministic(&plan, shots)
        } else if self.threads > 1 {
            self.sample_parallel(&plan, shots)?
        } else {
            self.sample_sequential(&plan, shots)
        };

        debug!(
            recorded = counts.total_shots(),
            outcomes = counts.len(),
            "sampling finished in {:?}",
            start.elapsed()
        );

        if counts.is_complete() {
            Ok(counts)
        } else {
            Err(SimError::CancelledSampling {
                partial: Box::new(counts),
            })
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn sample_deterministic(&self, plan: &TrajectoryPlan, shots: u64) -> OutcomeCounts {
        let mut counts = OutcomeCounts::new(plan.n_qubits as u32, shots);
        if !self.is_cancelled() {
            let bits = plan.run(&mut shot_rng(self.seed, 0));
            counts.insert(bits_to_string(&bits), shots);
        }
        counts
    }

    fn sample_sequential(&self, plan: &TrajectoryPlan, shots: u64) -> OutcomeCounts {
        let mut counts = OutcomeCounts::new(plan.n_qubits as u32, shots);
        for shot in 0..shots {
            if self.is_cancelled() {
                debug!(completed = shot, "sampling cancelled");
                break;
            }
            counts.record(&plan.run(&mut shot_rng(self.seed, shot)));

            if shot > 0 && shot % 100_000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }
        counts
    }

    fn sample_parallel(&self, plan: &TrajectoryPlan, shots: u64) -> SimResult<OutcomeCounts> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;
        let n_qubits = plan.n_qubits as u32;

        Ok(pool.install(|| {
            (0..shots)
                .into_par_iter()
                .fold(
                    || OutcomeCounts::new(n_qubits, shots),
                    |mut acc, shot| {
                        if !self.is_cancelled() {
                            acc.record(&plan.run(&mut shot_rng(self.seed, shot)));
                        }
                        acc
                    },
                )
                .reduce(
                    || OutcomeCounts::new(n_qubits, shots),
                    |mut a, b| {
                        a.merge(b);
                        a
                    },
                )
        }))
    }
}

/// Sample `shots` shots single-threaded; shorthand for [`Sampler::sample`].
pub fn sample(
    circuit: &Circuit,
    noise: &NoiseSpec,
    shots: u64,
    seed: u64,
) -> SimResult<OutcomeCounts> {
    Sampler::new(seed).sample(circuit, noise, shots)
}
