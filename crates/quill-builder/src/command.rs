//! The command value model.
//!
//! A [`Command`] is an immutable description of one operation over qubit and bit
//! tokens. Commands are never modified in place: [`Command::sub`] returns a new command
//! with operands renamed, and [`Command::append_to`] records the command in a
//! [`Circuit`] after checking every operand it references.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use quill_ir::{
    Angle, Bit, Circuit, Condition, IrError, Op, OpType, Operand, Operation, QControlBox, Qubit,
};

use crate::boxed::CircuitBox;
use crate::conditional::Conditional;
use crate::error::{CommandError, CommandResult};
use crate::native::NativeCell;

/// Qubit substitution map.
pub type QubitMap = FxHashMap<Qubit, Qubit>;

/// Bit substitution map.
pub type BitMap = FxHashMap<Bit, Bit>;

#[inline]
pub(crate) fn sub_qubit(qubit: Qubit, map: &QubitMap) -> Qubit {
    map.get(&qubit).copied().unwrap_or(qubit)
}

#[inline]
pub(crate) fn sub_bit(bit: Bit, map: &BitMap) -> Bit {
    map.get(&bit).copied().unwrap_or(bit)
}

/// Fail on the first operand that occurs twice.
pub(crate) fn ensure_distinct<T>(
    operands: impl IntoIterator<Item = T>,
    context: &'static str,
) -> CommandResult<()>
where
    T: Into<Operand> + Copy + Eq + std::hash::Hash,
{
    let mut seen = rustc_hash::FxHashSet::default();
    for operand in operands {
        if !seen.insert(operand) {
            return Err(CommandError::DuplicateOperand {
                operand: operand.into(),
                context,
            });
        }
    }
    Ok(())
}

// =========================================================================
// Primitive gates
// =========================================================================

/// Two-qubit gates without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwoQubitKind {
    /// Controlled-X.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
}

impl TwoQubitKind {
    /// Get the native tag.
    pub fn op_type(self) -> OpType {
        match self {
            TwoQubitKind::CX => OpType::CX,
            TwoQubitKind::CY => OpType::CY,
            TwoQubitKind::CZ => OpType::CZ,
        }
    }
}

/// Rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Native tag of the single-qubit rotation.
    pub fn rotation(self) -> OpType {
        match self {
            Axis::X => OpType::Rx,
            Axis::Y => OpType::Ry,
            Axis::Z => OpType::Rz,
        }
    }

    /// Native tag of the controlled rotation.
    pub fn controlled_rotation(self) -> OpType {
        match self {
            Axis::X => OpType::CRx,
            Axis::Y => OpType::CRy,
            Axis::Z => OpType::CRz,
        }
    }
}

/// A two-qubit gate on distinct target and control qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoQubitGate {
    kind: TwoQubitKind,
    target: Qubit,
    control: Qubit,
}

impl TwoQubitGate {
    /// Create a two-qubit gate.
    pub fn new(kind: TwoQubitKind, target: Qubit, control: Qubit) -> CommandResult<Self> {
        ensure_distinct([target, control], "a two-qubit gate")?;
        Ok(Self {
            kind,
            target,
            control,
        })
    }

    /// Create a CX gate.
    pub fn cx(target: Qubit, control: Qubit) -> CommandResult<Self> {
        Self::new(TwoQubitKind::CX, target, control)
    }

    /// Get the gate kind.
    pub fn kind(&self) -> TwoQubitKind {
        self.kind
    }

    /// Get the target qubit.
    pub fn target(&self) -> Qubit {
        self.target
    }

    /// Get the control qubit.
    pub fn control(&self) -> Qubit {
        self.control
    }

    fn sub(&self, qubit_map: &QubitMap) -> CommandResult<Self> {
        Self::new(
            self.kind,
            sub_qubit(self.target, qubit_map),
            sub_qubit(self.control, qubit_map),
        )
    }
}

/// A single-qubit rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationGate {
    axis: Axis,
    angle: Angle,
    qubit: Qubit,
}

impl RotationGate {
    /// Create a rotation.
    pub fn new(axis: Axis, angle: impl Into<Angle>, qubit: Qubit) -> Self {
        Self {
            axis,
            angle: angle.into(),
            qubit,
        }
    }

    /// Create an Rz rotation.
    pub fn rz(angle: impl Into<Angle>, qubit: Qubit) -> Self {
        Self::new(Axis::Z, angle, qubit)
    }

    /// Get the rotation axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Get the angle.
    pub fn angle(&self) -> &Angle {
        &self.angle
    }

    /// Get the qubit.
    pub fn qubit(&self) -> Qubit {
        self.qubit
    }
}

/// A controlled rotation on distinct target and control qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledRotationGate {
    axis: Axis,
    angle: Angle,
    target: Qubit,
    control: Qubit,
}

impl ControlledRotationGate {
    /// Create a controlled rotation.
    pub fn new(
        axis: Axis,
        angle: impl Into<Angle>,
        target: Qubit,
        control: Qubit,
    ) -> CommandResult<Self> {
        ensure_distinct([target, control], "a controlled rotation")?;
        Ok(Self {
            axis,
            angle: angle.into(),
            target,
            control,
        })
    }

    /// Create a CRz rotation.
    pub fn crz(angle: impl Into<Angle>, target: Qubit, control: Qubit) -> CommandResult<Self> {
        Self::new(Axis::Z, angle, target, control)
    }

    /// Get the rotation axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Get the angle.
    pub fn angle(&self) -> &Angle {
        &self.angle
    }

    /// Get the target qubit.
    pub fn target(&self) -> Qubit {
        self.target
    }

    /// Get the control qubit.
    pub fn control(&self) -> Qubit {
        self.control
    }
}

// =========================================================================
// Controlled
// =========================================================================

/// A command with additional quantum controls.
///
/// Controls are pairwise distinct and distinct from every qubit of the inner command.
/// The native control box is built on first append and shared by every copy and every
/// substituted version of this command.
#[derive(Debug, Clone, PartialEq)]
pub struct Controlled {
    command: Box<Command>,
    control_qubits: Vec<Qubit>,
    control_state: Vec<bool>,
    native: NativeCell<QControlBox>,
}

impl Controlled {
    /// Control `command` on all of `control_qubits` being |1⟩.
    pub fn new(
        command: impl Into<Command>,
        control_qubits: impl IntoIterator<Item = Qubit>,
    ) -> CommandResult<Self> {
        let control_qubits: Vec<Qubit> = control_qubits.into_iter().collect();
        let control_state = vec![true; control_qubits.len()];
        Self::with_control_state(command, control_qubits, control_state)
    }

    /// Control `command` on an explicit per-control state pattern.
    pub fn with_control_state(
        command: impl Into<Command>,
        control_qubits: impl IntoIterator<Item = Qubit>,
        control_state: impl IntoIterator<Item = bool>,
    ) -> CommandResult<Self> {
        Self::checked(
            command.into(),
            control_qubits.into_iter().collect(),
            control_state.into_iter().collect(),
            NativeCell::new(),
        )
    }

    /// Control `command` with a control box that is already built.
    pub(crate) fn with_handle(
        command: Command,
        control_qubits: Vec<Qubit>,
        handle: Arc<QControlBox>,
    ) -> CommandResult<Self> {
        let control_state = handle.control_state().to_vec();
        Self::checked(command, control_qubits, control_state, NativeCell::from(handle))
    }

    fn checked(
        command: Command,
        control_qubits: Vec<Qubit>,
        control_state: Vec<bool>,
        native: NativeCell<QControlBox>,
    ) -> CommandResult<Self> {
        if matches!(command, Command::Conditional(_)) {
            return Err(CommandError::UnsupportedNesting {
                outer: OpType::QControlBox,
                inner: OpType::Conditional,
            });
        }
        if control_state.len() != control_qubits.len() {
            return Err(CommandError::ArityMismatch {
                what: "control states",
                expected: control_qubits.len(),
                got: control_state.len(),
            });
        }
        ensure_distinct(
            control_qubits.iter().copied().chain(command.qubits()),
            "a controlled command",
        )?;
        Ok(Self {
            command: Box::new(command),
            control_qubits,
            control_state,
            native,
        })
    }

    /// Get the controlled command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Get the control qubits.
    pub fn control_qubits(&self) -> &[Qubit] {
        &self.control_qubits
    }

    /// Get the control state pattern.
    pub fn control_state(&self) -> &[bool] {
        &self.control_state
    }

    /// Check whether the native control box has been built.
    pub fn has_native_handle(&self) -> bool {
        self.native.is_initialized()
    }

    /// Get the native control box, building it on first use.
    pub fn native_handle(&self) -> CommandResult<Arc<QControlBox>> {
        if let Some(handle) = self.native.get() {
            return Ok(handle.clone());
        }
        let op = self.command.to_operation()?;
        Ok(self.native.get_or_init(|| {
            debug!(
                op = op.op_type().name(),
                n_controls = self.control_state.len(),
                "building control box"
            );
            QControlBox::new(op, self.control_state.clone())
        }))
    }

    fn sub(&self, qubit_map: &QubitMap, bit_map: &BitMap) -> CommandResult<Self> {
        // Substitution never changes the control topology, so the handle carries over.
        Self::checked(
            self.command.sub(qubit_map, bit_map)?,
            self.control_qubits
                .iter()
                .map(|&q| sub_qubit(q, qubit_map))
                .collect(),
            self.control_state.clone(),
            self.native.clone(),
        )
    }
}

// =========================================================================
// Command
// =========================================================================

/// A circuit command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Two-qubit gate.
    TwoQubitGate(TwoQubitGate),
    /// Single-qubit rotation.
    RotationGate(RotationGate),
    /// Controlled rotation.
    ControlledRotationGate(ControlledRotationGate),
    /// Command with quantum controls.
    Controlled(Controlled),
    /// Boxed sub-circuit.
    Box(CircuitBox),
    /// Classically conditioned command.
    Conditional(Conditional),
}

impl Command {
    /// Create a CX command.
    pub fn cx(target: Qubit, control: Qubit) -> CommandResult<Self> {
        Ok(TwoQubitGate::cx(target, control)?.into())
    }

    /// Create an Rz command.
    pub fn rz(angle: impl Into<Angle>, qubit: Qubit) -> Self {
        RotationGate::rz(angle, qubit).into()
    }

    /// Create a CRz command.
    pub fn crz(angle: impl Into<Angle>, target: Qubit, control: Qubit) -> CommandResult<Self> {
        Ok(ControlledRotationGate::crz(angle, target, control)?.into())
    }

    /// Get every qubit the command acts on.
    pub fn qubits(&self) -> Vec<Qubit> {
        match self {
            Command::TwoQubitGate(g) => vec![g.target, g.control],
            Command::RotationGate(g) => vec![g.qubit],
            Command::ControlledRotationGate(g) => vec![g.target, g.control],
            Command::Controlled(c) => {
                let mut qubits = c.control_qubits.clone();
                qubits.extend(c.command.qubits());
                qubits
            }
            Command::Box(b) => b.qubits().to_vec(),
            Command::Conditional(c) => c.command().qubits(),
        }
    }

    /// Get every bit the command reads or writes.
    pub fn bits(&self) -> Vec<Bit> {
        match self {
            Command::TwoQubitGate(_)
            | Command::RotationGate(_)
            | Command::ControlledRotationGate(_) => vec![],
            Command::Controlled(c) => c.command.bits(),
            Command::Box(b) => b.bits().to_vec(),
            Command::Conditional(c) => c.bits(),
        }
    }

    /// Get the angle parameters of the command.
    pub fn params(&self) -> Vec<&Angle> {
        match self {
            Command::TwoQubitGate(_) | Command::Box(_) => vec![],
            Command::RotationGate(g) => vec![&g.angle],
            Command::ControlledRotationGate(g) => vec![&g.angle],
            Command::Controlled(c) => c.command.params(),
            Command::Conditional(c) => c.command().params(),
        }
    }

    /// Get the native tag of the command.
    pub fn op_type(&self) -> OpType {
        match self {
            Command::TwoQubitGate(g) => g.kind.op_type(),
            Command::RotationGate(g) => g.axis.rotation(),
            Command::ControlledRotationGate(g) => g.axis.controlled_rotation(),
            Command::Controlled(_) => OpType::QControlBox,
            Command::Box(_) => OpType::CircBox,
            Command::Conditional(_) => OpType::Conditional,
        }
    }

    /// Return a new command with operands renamed.
    ///
    /// Operands present as keys are replaced; the rest are kept. Nested commands are
    /// rewritten recursively. The construction checks of each variant run again, so a
    /// map that merges two operands of one command fails with
    /// [`CommandError::DuplicateOperand`].
    pub fn sub(&self, qubit_map: &QubitMap, bit_map: &BitMap) -> CommandResult<Command> {
        Ok(match self {
            Command::TwoQubitGate(g) => Command::TwoQubitGate(g.sub(qubit_map)?),
            Command::RotationGate(g) => Command::RotationGate(RotationGate {
                qubit: sub_qubit(g.qubit, qubit_map),
                ..g.clone()
            }),
            Command::ControlledRotationGate(g) => {
                Command::ControlledRotationGate(ControlledRotationGate::new(
                    g.axis,
                    g.angle.clone(),
                    sub_qubit(g.target, qubit_map),
                    sub_qubit(g.control, qubit_map),
                )?)
            }
            Command::Controlled(c) => Command::Controlled(c.sub(qubit_map, bit_map)?),
            Command::Box(b) => Command::Box(b.sub(qubit_map, bit_map)?),
            Command::Conditional(c) => Command::Conditional(c.sub(qubit_map, bit_map)?),
        })
    }

    /// Get the native operation, without operands or condition.
    pub fn to_operation(&self) -> CommandResult<Operation> {
        match self {
            Command::TwoQubitGate(_)
            | Command::RotationGate(_)
            | Command::ControlledRotationGate(_) => Ok(Operation::Gate(self.primitive_op()?)),
            Command::Controlled(c) => Ok(Operation::QControlBox(c.native_handle()?)),
            Command::Box(b) => Ok(Operation::CircBox(b.native_handle())),
            Command::Conditional(_) => Err(CommandError::UnsupportedNesting {
                outer: OpType::QControlBox,
                inner: OpType::Conditional,
            }),
        }
    }

    fn primitive_op(&self) -> CommandResult<Op> {
        Ok(Op::new(
            self.op_type(),
            self.params().into_iter().cloned().collect(),
        )?)
    }

    /// Operands the circuit has not registered, qubits first.
    pub fn missing_operands(&self, circuit: &Circuit) -> Vec<Operand> {
        let mut missing = vec![];
        for qubit in self.qubits() {
            let operand = Operand::Qubit(qubit);
            if !circuit.has_qubit(qubit) && !missing.contains(&operand) {
                missing.push(operand);
            }
        }
        for bit in self.bits() {
            let operand = Operand::Bit(bit);
            if !circuit.has_bit(bit) && !missing.contains(&operand) {
                missing.push(operand);
            }
        }
        missing
    }

    /// Append this command to a circuit.
    ///
    /// Every referenced operand must already be registered in `circuit`; otherwise
    /// nothing is appended and [`CommandError::OperandNotFound`] names all of them.
    pub fn append_to(&self, circuit: &mut Circuit) -> CommandResult<()> {
        let missing = self.missing_operands(circuit);
        if !missing.is_empty() {
            return Err(CommandError::OperandNotFound { missing });
        }
        self.append_native(circuit, None).map_err(|e| match e {
            CommandError::Ir(IrError::OperandsNotFound { missing, .. }) => {
                CommandError::OperandNotFound { missing }
            }
            other => other,
        })
    }

    pub(crate) fn append_native(
        &self,
        circuit: &mut Circuit,
        condition: Option<Condition>,
    ) -> CommandResult<()> {
        match self {
            Command::TwoQubitGate(_)
            | Command::RotationGate(_)
            | Command::ControlledRotationGate(_) => {
                circuit.append_gate(self.primitive_op()?, self.qubits(), condition)?;
            }
            Command::Controlled(c) => {
                circuit.append_qcontrolbox(
                    c.native_handle()?,
                    self.qubits(),
                    self.bits(),
                    condition,
                )?;
            }
            Command::Box(b) => {
                circuit.append_circbox(
                    b.native_handle(),
                    b.qubits().iter().copied(),
                    b.bits().iter().copied(),
                    condition,
                )?;
            }
            Command::Conditional(c) => {
                if condition.is_some() {
                    return Err(CommandError::UnsupportedNesting {
                        outer: OpType::Conditional,
                        inner: OpType::Conditional,
                    });
                }
                c.command()
                    .append_native(circuit, Some(c.condition().clone()))?;
            }
        }
        Ok(())
    }
}

impl From<TwoQubitGate> for Command {
    fn from(g: TwoQubitGate) -> Self {
        Command::TwoQubitGate(g)
    }
}

impl From<RotationGate> for Command {
    fn from(g: RotationGate) -> Self {
        Command::RotationGate(g)
    }
}

impl From<ControlledRotationGate> for Command {
    fn from(g: ControlledRotationGate) -> Self {
        Command::ControlledRotationGate(g)
    }
}

impl From<Controlled> for Command {
    fn from(c: Controlled) -> Self {
        Command::Controlled(c)
    }
}

impl From<CircuitBox> for Command {
    fn from(b: CircuitBox) -> Self {
        Command::Box(b)
    }
}

impl From<Conditional> for Command {
    fn from(c: Conditional) -> Self {
        Command::Conditional(c)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op_type().name())?;
        let params = self.params();
        if !params.is_empty() {
            let params: Vec<String> = params.iter().map(ToString::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        let operands: Vec<String> = self
            .qubits()
            .iter()
            .map(ToString::to_string)
            .chain(self.bits().iter().map(ToString::to_string))
            .collect();
        write!(f, " {}", operands.join(", "))
    }
}
