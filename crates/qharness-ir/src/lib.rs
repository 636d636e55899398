//! qharness circuit representation
//!
//! Core data structures shared by the ansatz builder, the noise injector and
//! the sampler: qubit identifiers, the gate set, validated instructions, the
//! [`Circuit`] container and the per-gate [`NoiseSpec`].
//!
//! # Example
//!
//! ```rust
//! use qharness_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("pair", 2);
//! circuit.rx(0.5, QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `Rx`, `Ry` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{ROTATION_GATE_NAMES, StandardGate};
pub use instruction::Instruction;
pub use noise::NoiseSpec;
pub use qubit::QubitId;
