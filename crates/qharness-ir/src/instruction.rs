//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A gate applied to concrete qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstruction")]
pub struct Instruction {
    /// The gate.
    pub gate: StandardGate,
    /// Qubits this instruction operates on. For `CX` this is `[control, target]`.
    pub qubits: Vec<QubitId>,
}

#[derive(Deserialize)]
struct RawInstruction {
    gate: StandardGate,
    qubits: Vec<QubitId>,
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = IrError;

    fn try_from(raw: RawInstruction) -> IrResult<Self> {
        Self::new(raw.gate, raw.qubits)
    }
}

impl Instruction {
    /// Create a gate instruction, checking operand count and distinctness.
    pub fn new(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();

        if qubits.len() as u32 != gate.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }

        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }

        Ok(Self { gate, qubits })
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> IrResult<Self> {
        Self::new(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::new(gate, [q1, q2])
    }

    /// Get the gate name.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gate)?;
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{q}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_qubit_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(3)).unwrap();
        assert_eq!(inst.qubits, vec![QubitId(3)]);
        assert_eq!(inst.name(), "h");
        assert_eq!(format!("{inst}"), "h q3");
    }

    #[test]
    fn test_two_qubit_instruction() {
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)).unwrap();
        assert_eq!(inst.qubits, vec![QubitId(0), QubitId(1)]);
        assert_eq!(format!("{inst}"), "cx q0, q1");
    }

    #[test]
    fn test_cx_same_qubit_rejected() {
        let result = Instruction::two_qubit_gate(StandardGate::CX, QubitId(2), QubitId(2));
        assert!(matches!(
            result,
            Err(IrError::DuplicateQubit { qubit: QubitId(2), .. })
        ));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let result = Instruction::new(StandardGate::Rx(0.1), [QubitId(0), QubitId(1)]);
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch {
                expected: 1,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_checks_operands() {
        let ok: Instruction = serde_json::from_str(r#"{"gate":"CX","qubits":[0,2]}"#).unwrap();
        assert_eq!(ok.qubits, vec![QubitId(0), QubitId(2)]);

        let duplicate = serde_json::from_str::<Instruction>(r#"{"gate":"CX","qubits":[2,2]}"#);
        assert!(duplicate.unwrap_err().to_string().contains("q2"));
    }
}
