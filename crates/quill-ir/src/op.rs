//! Native operations accepted by a [`Circuit`](crate::Circuit).

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::angle::Angle;
use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};

/// Native operation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpType {
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Rotation around X.
    Rx,
    /// Rotation around Y.
    Ry,
    /// Rotation around Z.
    Rz,
    /// Controlled rotation around X.
    CRx,
    /// Controlled rotation around Y.
    CRy,
    /// Controlled rotation around Z.
    CRz,
    /// An operation with additional quantum controls.
    QControlBox,
    /// A boxed sub-circuit.
    CircBox,
    /// A classically conditioned operation.
    Conditional,
}

impl OpType {
    /// Get the name of this operation type.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            OpType::CX => "cx",
            OpType::CY => "cy",
            OpType::CZ => "cz",
            OpType::Rx => "rx",
            OpType::Ry => "ry",
            OpType::Rz => "rz",
            OpType::CRx => "crx",
            OpType::CRy => "cry",
            OpType::CRz => "crz",
            OpType::QControlBox => "qcontrolbox",
            OpType::CircBox => "circbox",
            OpType::Conditional => "conditional",
        }
    }

    /// Get the number of qubits of a primitive gate, `None` for composite types.
    #[inline]
    pub fn num_qubits(&self) -> Option<usize> {
        match self {
            OpType::Rx | OpType::Ry | OpType::Rz => Some(1),
            OpType::CX
            | OpType::CY
            | OpType::CZ
            | OpType::CRx
            | OpType::CRy
            | OpType::CRz => Some(2),
            OpType::QControlBox | OpType::CircBox | OpType::Conditional => None,
        }
    }

    /// Get the number of angle parameters of a primitive gate.
    #[inline]
    pub fn num_params(&self) -> usize {
        match self {
            OpType::Rx | OpType::Ry | OpType::Rz | OpType::CRx | OpType::CRy | OpType::CRz => 1,
            _ => 0,
        }
    }

    /// Check if this is a primitive gate.
    pub fn is_gate(&self) -> bool {
        self.num_qubits().is_some()
    }
}

/// A primitive gate with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Op {
    op_type: OpType,
    params: Vec<Angle>,
}

impl Op {
    /// Create a primitive gate, checking the tag and parameter count.
    pub fn new(op_type: OpType, params: Vec<Angle>) -> IrResult<Self> {
        if !op_type.is_gate() {
            return Err(IrError::InvalidOperation(format!(
                "'{}' is not a primitive gate",
                op_type.name()
            )));
        }
        if params.len() != op_type.num_params() {
            return Err(IrError::ArityMismatch {
                name: op_type.name().to_string(),
                what: "parameters",
                expected: op_type.num_params(),
                got: params.len(),
            });
        }
        Ok(Self { op_type, params })
    }

    /// Get the operation type.
    #[inline]
    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    /// Get the parameters.
    #[inline]
    pub fn params(&self) -> &[Angle] {
        &self.params
    }
}

/// Native handle for an operation with quantum controls.
///
/// The controls come first in the operand list, followed by the operands of the
/// controlled operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QControlBox {
    op: Operation,
    control_state: Vec<bool>,
}

impl QControlBox {
    /// Create a control box; the number of controls is `control_state.len()`.
    pub fn new(op: Operation, control_state: Vec<bool>) -> Self {
        Self { op, control_state }
    }

    /// Get the controlled operation.
    pub fn op(&self) -> &Operation {
        &self.op
    }

    /// Get the number of controls.
    pub fn n_controls(&self) -> usize {
        self.control_state.len()
    }

    /// Get the control state pattern.
    pub fn control_state(&self) -> &[bool] {
        &self.control_state
    }
}

/// Native handle for a boxed sub-circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircBox {
    circuit: Arc<Circuit>,
}

impl CircBox {
    /// Wrap a circuit.
    pub fn new(circuit: Arc<Circuit>) -> Self {
        Self { circuit }
    }

    /// Get the boxed circuit.
    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }
}

/// Anything a circuit can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operation {
    /// A primitive gate.
    Gate(Op),
    /// A controlled operation.
    QControlBox(Arc<QControlBox>),
    /// A boxed sub-circuit.
    CircBox(Arc<CircBox>),
}

impl Operation {
    /// Get the operation type.
    pub fn op_type(&self) -> OpType {
        match self {
            Operation::Gate(op) => op.op_type(),
            Operation::QControlBox(_) => OpType::QControlBox,
            Operation::CircBox(_) => OpType::CircBox,
        }
    }

    /// Get the number of qubits this operation acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Operation::Gate(op) => op.op_type().num_qubits().unwrap_or(0),
            Operation::QControlBox(b) => b.n_controls() + b.op().num_qubits(),
            Operation::CircBox(b) => b.circuit().num_qubits(),
        }
    }

    /// Get the number of classical bits this operation acts on.
    pub fn num_bits(&self) -> usize {
        match self {
            Operation::Gate(_) => 0,
            Operation::QControlBox(b) => b.op().num_bits(),
            Operation::CircBox(b) => b.circuit().num_bits(),
        }
    }
}

impl From<Op> for Operation {
    fn from(op: Op) -> Self {
        Operation::Gate(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_type_properties() {
        assert_eq!(OpType::CX.num_qubits(), Some(2));
        assert_eq!(OpType::Rz.num_qubits(), Some(1));
        assert_eq!(OpType::CircBox.num_qubits(), None);
        assert_eq!(OpType::CRz.num_params(), 1);
        assert_eq!(OpType::CZ.num_params(), 0);
    }

    #[test]
    fn test_op_validation() {
        assert!(Op::new(OpType::Rz, vec![Angle::symbol("a")]).is_ok());
        assert!(matches!(
            Op::new(OpType::Rz, vec![]),
            Err(IrError::ArityMismatch { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            Op::new(OpType::QControlBox, vec![]),
            Err(IrError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_qcontrolbox_arity() {
        let rz = Op::new(OpType::Rz, vec![Angle::constant(0.4)]).unwrap();
        let cbox = QControlBox::new(rz.into(), vec![true, true, false]);
        assert_eq!(cbox.n_controls(), 3);
        assert_eq!(Operation::QControlBox(Arc::new(cbox)).num_qubits(), 4);
    }
}
