//! Layered rotation/entanglement ansatz.
//!
//! Each layer applies `Rx(θ)` then `Ry(θ)` to every qubit, followed by a
//! brick of CNOTs on the pairs `(0,1), (2,3), …`:
//!
//! ```text
//! q0 ─Rx─Ry─●─   ─Rx─Ry─●─
//! q1 ─Rx─Ry─X─   ─Rx─Ry─X─
//! q2 ─Rx─Ry─●─   ─Rx─Ry─●─
//! q3 ─Rx─Ry─X─   ─Rx─Ry─X─
//! q4 ─Rx─Ry───   ─Rx─Ry───
//! ```
//!
//! Angles are pulled from an [`AngleSource`] in emission order, so a seeded
//! or fixed source reproduces the same circuit every time.
//!
//! # Example
//!
//! ```rust
//! use qharness_sim::ansatz::{LayeredAnsatz, SeededAngles};
//!
//! let mut angles = SeededAngles::new(7);
//! let circuit = LayeredAnsatz::new(4, 2).build(&mut angles).unwrap();
//! assert_eq!(circuit.num_ops(), 2 * (4 * 2 + 2));
//! ```

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use qharness_ir::{Circuit, QubitId};

use crate::error::{SimError, SimResult};

/// Supplies rotation angles to the builder.
pub trait AngleSource {
    /// Next angle in radians.
    fn next_angle(&mut self) -> f64;
}

impl<F: FnMut() -> f64> AngleSource for F {
    fn next_angle(&mut self) -> f64 {
        self()
    }
}

/// Uniform angles in `[0, 2π)` from a seeded generator.
pub struct SeededAngles {
    rng: StdRng,
}

impl SeededAngles {
    /// Create a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AngleSource for SeededAngles {
    fn next_angle(&mut self) -> f64 {
        self.rng.gen_range(0.0..TAU)
    }
}

/// Cycles through a fixed list of angles. An empty list yields `0.0`.
#[derive(Debug, Clone)]
pub struct AngleList {
    values: Vec<f64>,
    cursor: usize,
}

impl AngleList {
    /// Create a source over `values`.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl AngleSource for AngleList {
    fn next_angle(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let angle = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        angle
    }
}

/// A source that always returns `angle`.
pub fn constant(angle: f64) -> impl FnMut() -> f64 {
    move || angle
}

/// Default upper bound on circuit width.
pub const DEFAULT_MAX_QUBITS: u32 = 65_536;

/// Default upper bound on the number of gates one ansatz may emit.
pub const DEFAULT_MAX_GATES: u64 = 10_000_000;

/// Shape of a layered ansatz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredAnsatz {
    n_qubits: u32,
    n_layers: u32,
    max_qubits: u32,
    max_gates: u64,
}

impl LayeredAnsatz {
    /// Describe an ansatz of `n_layers` layers over `n_qubits` qubits.
    pub fn new(n_qubits: u32, n_layers: u32) -> Self {
        Self {
            n_qubits,
            n_layers,
            max_qubits: DEFAULT_MAX_QUBITS,
            max_gates: DEFAULT_MAX_GATES,
        }
    }

    /// Override the width bound.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Override the gate budget.
    #[must_use]
    pub fn with_max_gates(mut self, max_gates: u64) -> Self {
        self.max_gates = max_gates;
        self
    }

    /// Gates the build would emit, computed without overflow.
    pub fn gate_count(&self) -> u64 {
        let n = u64::from(self.n_qubits);
        u64::from(self.n_layers).saturating_mul(2 * n + n / 2)
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Number of layers.
    pub fn n_layers(&self) -> u32 {
        self.n_layers
    }

    /// Rotation gates emitted: two per qubit per layer.
    pub fn num_rotations(&self) -> usize {
        self.n_layers as usize * self.n_qubits as usize * 2
    }

    /// CNOTs emitted: one per adjacent even-indexed pair per layer.
    pub fn num_entanglers(&self) -> usize {
        self.n_layers as usize * (self.n_qubits as usize / 2)
    }

    /// Angles drawn from the source; equal to [`Self::num_rotations`].
    pub fn num_parameters(&self) -> usize {
        self.num_rotations()
    }

    /// Build the circuit, drawing one angle per rotation.
    pub fn build(&self, angles: &mut impl AngleSource) -> SimResult<Circuit> {
        if self.n_qubits == 0 {
            return Err(SimError::InvalidDimension {
                what: "n_qubits",
                got: 0,
            });
        }
        if self.n_qubits > self.max_qubits {
            return Err(SimError::DimensionTooLarge {
                what: "n_qubits",
                got: u64::from(self.n_qubits),
                max: u64::from(self.max_qubits),
            });
        }
        let gates = self.gate_count();
        if gates > self.max_gates {
            return Err(SimError::DimensionTooLarge {
                what: "gate count",
                got: gates,
                max: self.max_gates,
            });
        }

        debug!(
            n_qubits = self.n_qubits,
            n_layers = self.n_layers,
            n_parameters = self.num_parameters(),
            "building layered ansatz"
        );

        let mut circuit = Circuit::new("layered_ansatz", self.n_qubits);
        for _ in 0..self.n_layers {
            for q in 0..self.n_qubits {
                circuit.rx(angles.next_angle(), QubitId(q))?;
                circuit.ry(angles.next_angle(), QubitId(q))?;
            }
            for i in (0..self.n_qubits - 1).step_by(2) {
                circuit.cx(QubitId(i), QubitId(i + 1))?;
            }
        }

        Ok(circuit)
    }
}

/// Build a layered ansatz; shorthand for [`LayeredAnsatz::build`].
pub fn build(n_qubits: u32, n_layers: u32, angles: &mut impl AngleSource) -> SimResult<Circuit> {
    LayeredAnsatz::new(n_qubits, n_layers).build(angles)
}
