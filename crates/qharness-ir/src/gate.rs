//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// The gate set used by the layered ansatz and the stabilizer block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Rotation around X axis by the given angle (radians).
    Rx(f64),
    /// Rotation around Y axis by the given angle (radians).
    Ry(f64),
    /// Controlled-X (CNOT) gate.
    CX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::CX => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::H | StandardGate::Rx(_) | StandardGate::Ry(_) => 1,
            StandardGate::CX => 2,
        }
    }

    /// Rotation angle, if this gate has one.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) => Some(*theta),
            StandardGate::H | StandardGate::CX => None,
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({:.4})", self.name(), theta),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Names of the single-qubit rotation gates, in the order the ansatz emits them.
pub const ROTATION_GATE_NAMES: [&str; 2] = ["rx", "ry"];
