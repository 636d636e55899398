//! Noise injection: attach a depolarizing model and the stabilizer block.
//!
//! The injector never touches its input. It returns a new circuit made of the
//! original gates followed by a Hadamard on every [`STABILIZER_STRIDE`]th
//! qubit, plus a [`NoiseSpec`] tagging the rotation gates with the error
//! rate. The appended block is a placeholder for stabilizer measurement; no
//! syndrome is decoded.

use tracing::debug;

use qharness_ir::{Circuit, NoiseSpec, QubitId, ROTATION_GATE_NAMES};

use crate::error::{SimError, SimResult};

/// Spacing of the qubits that receive a stabilizer Hadamard (`0, 5, 10, …`).
pub const STABILIZER_STRIDE: u32 = 5;

/// The stabilizer placeholder block for an `n_qubits`-wide circuit.
pub fn stabilizer_block(n_qubits: u32) -> SimResult<Circuit> {
    let mut block = Circuit::new("stabilizer", n_qubits);
    for q in (0..n_qubits).step_by(STABILIZER_STRIDE as usize) {
        block.h(QubitId(q))?;
    }
    Ok(block)
}

/// Append the stabilizer block and build the rotation-gate noise model.
pub fn inject(circuit: &Circuit, p: f64) -> SimResult<(Circuit, NoiseSpec)> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::InvalidProbability(p));
    }

    let n_qubits = circuit.num_qubits() as u32;
    let block = stabilizer_block(n_qubits)?;
    let noisy = circuit.compose(&block)?;
    let noise = NoiseSpec::depolarizing(p, ROTATION_GATE_NAMES)?;

    debug!(
        p,
        original_ops = circuit.num_ops(),
        stabilizer_ops = block.num_ops(),
        "injected noise model"
    );

    Ok((noisy, noise))
}
