//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit: an ordered gate list over a fixed number of wires.
///
/// Every appended instruction is validated against the circuit width, so a
/// `Circuit` value never references a qubit outside `[0, num_qubits)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubit wires.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

/// Unchecked serialized form, replayed through [`Circuit::apply`].
#[derive(Deserialize)]
struct RawCircuit {
    #[serde(default)]
    name: String,
    num_qubits: u32,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Circuit::new(raw.name, raw.num_qubits);
        for instruction in raw.instructions {
            circuit.apply(instruction)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` wires.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Append a validated instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(instruction.name().to_string()),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit)?)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit)?)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit)?)
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            control,
            target,
        )?)
    }

    /// Return a new circuit holding `self`'s instructions followed by `other`'s.
    ///
    /// Neither input is modified.
    pub fn compose(&self, other: &Circuit) -> IrResult<Circuit> {
        if other.num_qubits != self.num_qubits {
            return Err(IrError::WidthMismatch {
                this: self.num_qubits,
                other: other.num_qubits,
            });
        }
        let mut composed = self.clone();
        composed
            .instructions
            .extend(other.instructions.iter().cloned());
        Ok(composed)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Instruction count per gate name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Get the circuit depth (longest chain of instructions sharing a wire).
    pub fn depth(&self) -> usize {
        let mut wire_depth = vec![0usize; self.num_qubits()];
        for inst in &self.instructions {
            let layer = inst
                .qubits
                .iter()
                .map(|q| wire_depth[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                wire_depth[q.index()] = layer;
            }
        }
        wire_depth.into_iter().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_ops(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::new("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .rx(PI / 2.0, QubitId(1))
            .unwrap();

        assert_eq!(circuit.num_ops(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut circuit = Circuit::new("test", 3);
        for q in 0..3 {
            circuit.rx(0.1, QubitId(q)).unwrap();
            circuit.ry(0.2, QubitId(q)).unwrap();
        }
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_out_of_range_qubit() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(2), .. }));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_cx_target_out_of_range() {
        let mut circuit = Circuit::new("test", 2);
        assert!(circuit.cx(QubitId(1), QubitId(5)).is_err());
    }

    #[test]
    fn test_count_ops() {
        let mut circuit = Circuit::new("test", 2);
        circuit.rx(0.1, QubitId(0)).unwrap();
        circuit.rx(0.2, QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let counts = circuit.count_ops();
        assert_eq!(counts.get("rx"), Some(&2));
        assert_eq!(counts.get("cx"), Some(&1));
        assert_eq!(counts.get("h"), None);
    }

    #[test]
    fn test_compose_preserves_inputs() {
        let mut a = Circuit::new("a", 2);
        a.rx(0.3, QubitId(0)).unwrap();
        let mut b = Circuit::new("b", 2);
        b.h(QubitId(1)).unwrap();

        let c = a.compose(&b).unwrap();
        assert_eq!(c.num_ops(), 2);
        assert_eq!(&c.instructions()[..1], a.instructions());
        assert_eq!(a.num_ops(), 1);
        assert_eq!(b.num_ops(), 1);
    }

    #[test]
    fn test_compose_width_mismatch() {
        let a = Circuit::new("a", 2);
        let b = Circuit::new("b", 3);
        assert!(matches!(
            a.compose(&b),
            Err(IrError::WidthMismatch { this: 2, other: 3 })
        ));
    }

    #[test]
    fn test_circuit_serialization() {
        let mut circuit = Circuit::new("ser", 2);
        circuit.ry(1.5, QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_qubit() {
        let json = r#"{"num_qubits":2,"instructions":[{"gate":{"Rx":3.14159},"qubits":[7]}]}"#;
        let err = serde_json::from_str::<Circuit>(json).unwrap_err();
        assert!(err.to_string().contains("q7"), "{err}");

        let json = r#"{"num_qubits":2,"instructions":[{"gate":"H","qubits":[2]}]}"#;
        assert!(serde_json::from_str::<Circuit>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_operands() {
        let duplicate = r#"{"num_qubits":3,"instructions":[{"gate":"CX","qubits":[1,1]}]}"#;
        assert!(serde_json::from_str::<Circuit>(duplicate).is_err());

        let arity = r#"{"num_qubits":3,"instructions":[{"gate":"H","qubits":[0,1]}]}"#;
        assert!(serde_json::from_str::<Circuit>(arity).is_err());
    }
}
