//! Circuit instructions combining operations with operands.

use serde::Serialize;
use std::sync::Arc;

use crate::condition::Condition;
use crate::op::{CircBox, Op, Operation, QControlBox};
use crate::unit::{Bit, Qubit};

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    /// The operation.
    pub operation: Operation,
    /// Qubits this instruction operates on.
    pub qubits: Vec<Qubit>,
    /// Classical bits this instruction operates on.
    pub bits: Vec<Bit>,
    /// Optional classical condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(op: Op, qubits: impl IntoIterator<Item = Qubit>) -> Self {
        Self {
            operation: Operation::Gate(op),
            qubits: qubits.into_iter().collect(),
            bits: vec![],
            condition: None,
        }
    }

    /// Create a controlled-operation instruction.
    ///
    /// `bits` are the bits of the controlled operation; controls are quantum only.
    pub fn qcontrolbox(
        handle: Arc<QControlBox>,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
    ) -> Self {
        Self {
            operation: Operation::QControlBox(handle),
            qubits: qubits.into_iter().collect(),
            bits: bits.into_iter().collect(),
            condition: None,
        }
    }

    /// Create a boxed sub-circuit instruction.
    pub fn circbox(
        handle: Arc<CircBox>,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
    ) -> Self {
        Self {
            operation: Operation::CircBox(handle),
            qubits: qubits.into_iter().collect(),
            bits: bits.into_iter().collect(),
            condition: None,
        }
    }

    /// Attach a classical condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Check if this instruction is conditioned.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Get the primitive gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Op> {
        match &self.operation {
            Operation::Gate(op) => Some(op),
            _ => None,
        }
    }

    /// Get the bits read by the condition, if any.
    pub fn condition_bits(&self) -> Vec<Bit> {
        self.condition.as_ref().map(Condition::bits).unwrap_or_default()
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &'static str {
        self.operation.op_type().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use crate::condition::ThresholdCondition;
    use crate::op::OpType;

    #[test]
    fn test_gate_instruction() {
        let q = Qubit::new();
        let inst = Instruction::gate(Op::new(OpType::Rz, vec![Angle::constant(0.3)]).unwrap(), [q]);
        assert_eq!(inst.name(), "rz");
        assert_eq!(inst.qubits, vec![q]);
        assert!(!inst.is_conditional());
        assert!(inst.as_gate().is_some());
    }

    #[test]
    fn test_conditional_instruction() {
        let (q0, q1) = (Qubit::new(), Qubit::new());
        let (c0, c1) = (Bit::new(), Bit::new());
        let inst = Instruction::gate(Op::new(OpType::CX, vec![]).unwrap(), [q0, q1])
            .with_condition(ThresholdCondition::new([c0, c1], 1));
        assert!(inst.is_conditional());
        assert_eq!(inst.condition_bits(), vec![c0, c1]);
    }
}
