//! The circuit container commands are appended to.

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::Arc;
use tracing::trace;

use crate::condition::Condition;
use crate::dag::{CircuitDag, NodeIndex};
use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::op::{CircBox, Op, QControlBox};
use crate::unit::{Bit, BitRegister, Qubit, QubitRegister};

/// A quantum circuit.
///
/// Owns the registries of its qubits and bits (in registration order) and the
/// instructions appended so far. Every append is validated against the registries
/// before anything is recorded.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in registration order.
    qubits: Vec<Qubit>,
    /// Classical bits in registration order.
    bits: Vec<Bit>,
    /// The underlying DAG representation.
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            bits: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// Register a qubit. Returns `false` if it was already registered.
    pub fn add_qubit(&mut self, qubit: Qubit) -> bool {
        let added = self.dag.add_qubit(qubit);
        if added {
            self.qubits.push(qubit);
        }
        added
    }

    /// Register a classical bit. Returns `false` if it was already registered.
    pub fn add_bit(&mut self, bit: Bit) -> bool {
        let added = self.dag.add_bit(bit);
        if added {
            self.bits.push(bit);
        }
        added
    }

    /// Create and register a quantum register.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: usize) -> QubitRegister {
        let reg = QubitRegister::new(name, size);
        for &q in reg.qubits() {
            self.add_qubit(q);
        }
        reg
    }

    /// Create and register a classical register.
    pub fn add_creg(&mut self, name: impl Into<String>, size: usize) -> BitRegister {
        let reg = BitRegister::new(name, size);
        for &b in reg.bits() {
            self.add_bit(b);
        }
        reg
    }

    /// Check if a qubit is registered.
    #[inline]
    pub fn has_qubit(&self, qubit: Qubit) -> bool {
        self.dag.has_qubit(qubit)
    }

    /// Check if a classical bit is registered.
    #[inline]
    pub fn has_bit(&self, bit: Bit) -> bool {
        self.dag.has_bit(bit)
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Append an instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        trace!(
            circuit = %self.name,
            op = instruction.name(),
            qubits = instruction.qubits.len(),
            bits = instruction.bits.len(),
            conditional = instruction.is_conditional(),
            "append instruction"
        );
        self.dag.apply(instruction)
    }

    /// Append a primitive gate.
    pub fn append_gate(
        &mut self,
        op: Op,
        qubits: impl IntoIterator<Item = Qubit>,
        condition: Option<Condition>,
    ) -> IrResult<&mut Self> {
        let mut inst = Instruction::gate(op, qubits);
        inst.condition = condition;
        self.append(inst)?;
        Ok(self)
    }

    /// Append a controlled operation; controls come first in `qubits`.
    pub fn append_qcontrolbox(
        &mut self,
        handle: Arc<QControlBox>,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
        condition: Option<Condition>,
    ) -> IrResult<&mut Self> {
        let mut inst = Instruction::qcontrolbox(handle, qubits, bits);
        inst.condition = condition;
        self.append(inst)?;
        Ok(self)
    }

    /// Append a boxed sub-circuit.
    pub fn append_circbox(
        &mut self,
        handle: Arc<CircBox>,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
        condition: Option<Condition>,
    ) -> IrResult<&mut Self> {
        let mut inst = Instruction::circbox(handle, qubits, bits);
        inst.condition = condition;
        self.append(inst)?;
        Ok(self)
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Return a copy with units renamed; unmapped units keep their identity.
    ///
    /// Fails if two registered units of the same kind end up with the same name.
    pub fn rename_units(
        &self,
        qubit_map: &FxHashMap<Qubit, Qubit>,
        bit_map: &FxHashMap<Bit, Bit>,
    ) -> IrResult<Circuit> {
        let q = |q: &Qubit| qubit_map.get(q).copied().unwrap_or(*q);
        let b = |b: &Bit| bit_map.get(b).copied().unwrap_or(*b);

        let mut renamed = Circuit::new(self.name.clone());
        for qubit in self.qubits.iter().map(q) {
            if !renamed.add_qubit(qubit) {
                return Err(IrError::DuplicateOperand {
                    operand: qubit.into(),
                    gate_name: None,
                });
            }
        }
        for bit in self.bits.iter().map(b) {
            if !renamed.add_bit(bit) {
                return Err(IrError::DuplicateOperand {
                    operand: bit.into(),
                    gate_name: None,
                });
            }
        }
        for inst in self.instructions() {
            renamed.append(Instruction {
                operation: inst.operation.clone(),
                qubits: inst.qubits.iter().map(q).collect(),
                bits: inst.bits.iter().map(b).collect(),
                condition: inst.condition.as_ref().map(|c| c.map_bits(b)),
            })?;
        }
        Ok(renamed)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the qubits in registration order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in registration order.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of appended instructions.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Iterate over appended instructions in append order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.instructions()
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.qubits == other.qubits
            && self.bits == other.bits
            && self.instructions().eq(other.instructions())
    }
}

impl Serialize for Circuit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let instructions: Vec<&Instruction> = self.instructions().collect();
        let mut state = serializer.serialize_struct("Circuit", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("qubits", &self.qubits)?;
        state.serialize_field("bits", &self.bits)?;
        state.serialize_field("instructions", &instructions)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use crate::condition::{BitLogicExp, ThresholdCondition};
    use crate::op::{OpType, Operation};
    use crate::unit::Operand;

    fn cx() -> Op {
        Op::new(OpType::CX, vec![]).unwrap()
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_bits(), 0);
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 4);
        let c = circuit.add_creg("c", 2);

        assert_eq!(circuit.qubits(), q.qubits());
        assert_eq!(circuit.bits(), c.bits());
        assert!(circuit.has_qubit(q[3]));
        assert!(circuit.has_bit(c[1]));
        assert!(!circuit.has_qubit(Qubit::new()));
        assert!(!circuit.add_qubit(q[0]));
    }

    #[test]
    fn test_fluent_append() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 2);
        circuit
            .append_gate(cx(), [q[0], q[1]], None)
            .unwrap()
            .append_gate(
                Op::new(OpType::Rz, vec![Angle::symbol("a")]).unwrap(),
                [q[1]],
                None,
            )
            .unwrap();

        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.depth(), 2);
        let names: Vec<_> = circuit.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "rz"]);
    }

    #[test]
    fn test_failed_append_leaves_circuit_untouched() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 1);
        let stranger = Qubit::new();

        let err = circuit.append_gate(cx(), [q[0], stranger], None).unwrap_err();
        assert!(matches!(err, IrError::OperandsNotFound { ref missing, .. } if missing == &vec![Operand::from(stranger)]));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_circbox_arity_checked() {
        let mut inner = Circuit::new("inner");
        inner.add_qreg("q", 2);
        let handle = Arc::new(CircBox::new(Arc::new(inner)));

        let mut outer = Circuit::new("outer");
        let q = outer.add_qreg("q", 3);
        assert!(matches!(
            outer.append_circbox(handle.clone(), [q[0]], [], None),
            Err(IrError::ArityMismatch { expected: 2, got: 1, .. })
        ));
        outer.append_circbox(handle, [q[2], q[0]], [], None).unwrap();
        assert_eq!(outer.num_ops(), 1);
    }

    #[test]
    fn test_rename_units() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 2);
        let c = circuit.add_creg("c", 2);
        circuit
            .append_gate(
                cx(),
                [q[0], q[1]],
                Some(Condition::Expression(c[0] | c[1])),
            )
            .unwrap();

        let qubit_map: FxHashMap<_, _> = [(q[0], Qubit::canonical(0)), (q[1], Qubit::canonical(1))]
            .into_iter()
            .collect();
        let bit_map: FxHashMap<_, _> = [(c[0], Bit::canonical(0))].into_iter().collect();
        let renamed = circuit.rename_units(&qubit_map, &bit_map).unwrap();

        assert_eq!(renamed.qubits(), &[Qubit::canonical(0), Qubit::canonical(1)]);
        assert_eq!(renamed.bits(), &[Bit::canonical(0), c[1]]);
        let inst = renamed.instructions().next().unwrap();
        assert_eq!(inst.qubits, vec![Qubit::canonical(0), Qubit::canonical(1)]);
        assert_eq!(
            inst.condition,
            Some(Condition::Expression(BitLogicExp::Or(
                Box::new(Bit::canonical(0).into()),
                Box::new(c[1].into()),
            )))
        );
    }

    #[test]
    fn test_rename_units_rejects_collisions() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 2);
        let qubit_map: FxHashMap<_, _> = [(q[0], q[1])].into_iter().collect();
        assert!(matches!(
            circuit.rename_units(&qubit_map, &FxHashMap::default()),
            Err(IrError::DuplicateOperand { .. })
        ));
    }

    #[test]
    fn test_serialize() {
        let mut circuit = Circuit::new("json");
        let q = circuit.add_qreg("q", 1);
        let c = circuit.add_creg("c", 1);
        circuit
            .append_gate(
                Op::new(OpType::Rx, vec![Angle::constant(0.5)]).unwrap(),
                [q[0]],
                Some(ThresholdCondition::new([c[0]], 1).into()),
            )
            .unwrap();

        let json = serde_json::to_value(&circuit).unwrap();
        assert_eq!(json["name"], "json");
        assert_eq!(json["instructions"].as_array().unwrap().len(), 1);
        assert!(json["instructions"][0]["condition"].is_object());
        assert!(matches!(
            circuit.instructions().next().unwrap().operation,
            Operation::Gate(_)
        ));
    }
}
