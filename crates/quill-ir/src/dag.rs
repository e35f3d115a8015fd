//! DAG recording the instructions appended to a circuit.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::unit::{Bit, Operand, Qubit};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireId {
    /// A quantum wire.
    Qubit(Qubit),
    /// A classical wire.
    Bit(Bit),
}

impl From<Qubit> for WireId {
    fn from(q: Qubit) -> Self {
        WireId::Qubit(q)
    }
}

impl From<Bit> for WireId {
    fn from(b: Bit) -> Self {
        WireId::Bit(b)
    }
}

/// An edge in the circuit DAG representing a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// DAG-based record of a circuit.
///
/// Every wire runs from its `In` node through the operations touching it, in append
/// order, to its `Out` node. Condition bits are wired like ordinary operands.
///
/// Nodes are never removed, so node indices increase in append order and
/// [`CircuitDag::instructions`] yields instructions in the order they were applied.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from wire to its output node.
    outputs: FxHashMap<WireId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    num_qubits: usize,
    num_bits: usize,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.outputs.contains_key(&wire) {
            return false;
        }
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.outputs.insert(wire, out_node);
        self.wire_front.insert(wire, in_node);
        true
    }

    /// Add a qubit wire. Returns `false` if it already exists.
    pub fn add_qubit(&mut self, qubit: Qubit) -> bool {
        let added = self.add_wire(qubit.into());
        if added {
            self.num_qubits += 1;
        }
        added
    }

    /// Add a classical wire. Returns `false` if it already exists.
    pub fn add_bit(&mut self, bit: Bit) -> bool {
        let added = self.add_wire(bit.into());
        if added {
            self.num_bits += 1;
        }
        added
    }

    /// Check if a qubit wire exists.
    #[inline]
    pub fn has_qubit(&self, qubit: Qubit) -> bool {
        self.outputs.contains_key(&WireId::Qubit(qubit))
    }

    /// Check if a classical wire exists.
    #[inline]
    pub fn has_bit(&self, bit: Bit) -> bool {
        self.outputs.contains_key(&WireId::Bit(bit))
    }

    /// Check an instruction without applying it.
    ///
    /// Reports every missing operand at once, then operand arity, then duplicates.
    pub fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = Some(instruction.name().to_string());

        let condition_bits = instruction.condition_bits();
        let mut missing = vec![];
        for &qubit in &instruction.qubits {
            let operand = Operand::Qubit(qubit);
            if !self.has_qubit(qubit) && !missing.contains(&operand) {
                missing.push(operand);
            }
        }
        for &bit in instruction.bits.iter().chain(&condition_bits) {
            let operand = Operand::Bit(bit);
            if !self.has_bit(bit) && !missing.contains(&operand) {
                missing.push(operand);
            }
        }
        if !missing.is_empty() {
            return Err(IrError::OperandsNotFound { missing, gate_name });
        }

        let expected = instruction.operation.num_qubits();
        if instruction.qubits.len() != expected {
            return Err(IrError::ArityMismatch {
                name: instruction.name().to_string(),
                what: "qubits",
                expected,
                got: instruction.qubits.len(),
            });
        }
        let expected = instruction.operation.num_bits();
        if instruction.bits.len() != expected {
            return Err(IrError::ArityMismatch {
                name: instruction.name().to_string(),
                what: "bits",
                expected,
                got: instruction.bits.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(WireId::Qubit(qubit)) {
                return Err(IrError::DuplicateOperand {
                    operand: qubit.into(),
                    gate_name,
                });
            }
        }
        for &bit in &instruction.bits {
            if !seen.insert(WireId::Bit(bit)) {
                return Err(IrError::DuplicateOperand {
                    operand: bit.into(),
                    gate_name,
                });
            }
        }
        Ok(())
    }

    /// Apply an instruction to the circuit.
    ///
    /// The DAG is left untouched if validation fails.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let mut wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.bits.iter().map(|&b| WireId::Bit(b)))
            .collect();
        // A condition may read a bit the operation also writes.
        for bit in instruction.condition_bits() {
            let wire = WireId::Bit(bit);
            if !wires.contains(&wire) {
                wires.push(wire);
            }
        }

        let op_node = self.graph.add_node(DagNode::Op(instruction));
        for wire in wires {
            let out_node = self.outputs[&wire];
            let prev_node = self.wire_front[&wire];

            let edge_id = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire:?}"
                    ))
                })?;
            self.graph.remove_edge(edge_id);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over instructions in append order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction())
    }

    /// Get the number of qubit wires.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of classical wires.
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus input and output nodes (2 per wire).
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.outputs.len())
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut max_depth = 0usize;

        // Edges only ever point from earlier to later nodes, so index order is a
        // topological order.
        for node in self.graph.node_indices() {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if matches!(self.graph[node], DagNode::Op(_)) {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }
}
