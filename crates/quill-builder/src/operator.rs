//! Operand-free operators.
//!
//! An [`Operator`] describes an operation without saying where it acts. Applying it to
//! qubits (and bits, for boxes) produces a [`Command`]. Native handles are built when
//! the operator is created, so every command applied from one operator shares them.

use std::sync::Arc;
use tracing::debug;

use quill_ir::{Angle, Bit, CircBox, Circuit, Op, Operation, QControlBox, Qubit};

use crate::boxed::CircuitBox;
use crate::command::{
    Axis, Command, Controlled, ControlledRotationGate, RotationGate, TwoQubitGate, TwoQubitKind,
};
use crate::error::{CommandError, CommandResult};

/// A reusable operation not yet bound to operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Two-qubit gate, applied as `[target, control]`.
    TwoQubit(TwoQubitKind),
    /// Single-qubit rotation.
    Rotation(Axis, Angle),
    /// Controlled rotation, applied as `[target, control]`.
    ControlledRotation(Axis, Angle),
    /// Operator with quantum controls.
    QControlled(QControlled),
    /// Boxed sub-circuit.
    Box(BoxOperator),
}

impl Operator {
    /// CX operator.
    pub fn cx() -> Self {
        Operator::TwoQubit(TwoQubitKind::CX)
    }

    /// Rz operator.
    pub fn rz(angle: impl Into<Angle>) -> Self {
        Operator::Rotation(Axis::Z, angle.into())
    }

    /// CRz operator.
    pub fn crz(angle: impl Into<Angle>) -> Self {
        Operator::ControlledRotation(Axis::Z, angle.into())
    }

    /// Get the number of qubits the operator is applied to.
    pub fn num_qubits(&self) -> usize {
        match self {
            Operator::TwoQubit(_) | Operator::ControlledRotation(..) => 2,
            Operator::Rotation(..) => 1,
            Operator::QControlled(c) => c.n_controls() + c.operator.num_qubits(),
            Operator::Box(b) => b.payload().num_qubits(),
        }
    }

    /// Get the number of bits the operator is applied to.
    pub fn num_bits(&self) -> usize {
        match self {
            Operator::TwoQubit(_) | Operator::Rotation(..) | Operator::ControlledRotation(..) => 0,
            Operator::QControlled(c) => c.operator.num_bits(),
            Operator::Box(b) => b.payload().num_bits(),
        }
    }

    /// Get the native operation.
    pub fn to_operation(&self) -> CommandResult<Operation> {
        Ok(match self {
            Operator::TwoQubit(kind) => Op::new(kind.op_type(), vec![])?.into(),
            Operator::Rotation(axis, angle) => Op::new(axis.rotation(), vec![angle.clone()])?.into(),
            Operator::ControlledRotation(axis, angle) => {
                Op::new(axis.controlled_rotation(), vec![angle.clone()])?.into()
            }
            Operator::QControlled(c) => Operation::QControlBox(Arc::clone(&c.handle)),
            Operator::Box(b) => Operation::CircBox(Arc::clone(&b.handle)),
        })
    }

    /// Bind the operator to operands.
    pub fn apply(&self, qubits: &[Qubit], bits: &[Bit]) -> CommandResult<Command> {
        if qubits.len() != self.num_qubits() {
            return Err(CommandError::ArityMismatch {
                what: "operator qubits",
                expected: self.num_qubits(),
                got: qubits.len(),
            });
        }
        if bits.len() != self.num_bits() {
            return Err(CommandError::ArityMismatch {
                what: "operator bits",
                expected: self.num_bits(),
                got: bits.len(),
            });
        }

        Ok(match self {
            Operator::TwoQubit(kind) => TwoQubitGate::new(*kind, qubits[0], qubits[1])?.into(),
            Operator::Rotation(axis, angle) => {
                RotationGate::new(*axis, angle.clone(), qubits[0]).into()
            }
            Operator::ControlledRotation(axis, angle) => {
                ControlledRotationGate::new(*axis, angle.clone(), qubits[0], qubits[1])?.into()
            }
            Operator::QControlled(c) => {
                let (controls, rest) = qubits.split_at(c.n_controls());
                let inner = c.operator.apply(rest, bits)?;
                Controlled::with_handle(inner, controls.to_vec(), Arc::clone(&c.handle))?.into()
            }
            Operator::Box(b) => {
                CircuitBox::with_handle(Arc::clone(&b.handle), qubits.to_vec(), bits.to_vec())?
                    .into()
            }
        })
    }

    /// Apply the operator and append the result to `circuit`.
    pub fn append_to(
        &self,
        circuit: &mut Circuit,
        qubits: &[Qubit],
        bits: &[Bit],
    ) -> CommandResult<()> {
        self.apply(qubits, bits)?.append_to(circuit)
    }
}

/// An operator controlled on extra qubits, with its control box built up front.
#[derive(Debug, Clone, PartialEq)]
pub struct QControlled {
    operator: Box<Operator>,
    handle: Arc<QControlBox>,
}

impl QControlled {
    /// Control `operator` on `n_controls` qubits.
    ///
    /// An empty `control_state` means every control must be |1⟩.
    pub fn new(
        operator: impl Into<Operator>,
        n_controls: usize,
        control_state: impl IntoIterator<Item = bool>,
    ) -> CommandResult<Self> {
        let operator = operator.into();
        let mut control_state: Vec<bool> = control_state.into_iter().collect();
        if control_state.is_empty() {
            control_state = vec![true; n_controls];
        } else if control_state.len() != n_controls {
            return Err(CommandError::ArityMismatch {
                what: "control states",
                expected: n_controls,
                got: control_state.len(),
            });
        }

        let op = operator.to_operation()?;
        debug!(op = op.op_type().name(), n_controls, "building control box");
        Ok(Self {
            operator: Box::new(operator),
            handle: Arc::new(QControlBox::new(op, control_state)),
        })
    }

    /// Get the controlled operator.
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Get the number of controls.
    pub fn n_controls(&self) -> usize {
        self.handle.n_controls()
    }

    /// Get the native control box.
    pub fn handle(&self) -> &Arc<QControlBox> {
        &self.handle
    }
}

impl From<QControlled> for Operator {
    fn from(c: QControlled) -> Self {
        Operator::QControlled(c)
    }
}

/// A boxed sub-circuit not yet bound to operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOperator {
    handle: Arc<CircBox>,
}

impl BoxOperator {
    /// Box a circuit; its units are canonicalized in registration order.
    pub fn from_circuit(circuit: &Circuit) -> CommandResult<Self> {
        Ok(Self {
            handle: CircuitBox::from_circuit(circuit)?.native_handle(),
        })
    }

    /// Get the canonical payload.
    pub fn payload(&self) -> &Arc<Circuit> {
        self.handle.circuit()
    }

    /// Get the native box.
    pub fn handle(&self) -> &Arc<CircBox> {
        &self.handle
    }
}

impl From<BoxOperator> for Operator {
    fn from(b: BoxOperator) -> Self {
        Operator::Box(b)
    }
}
