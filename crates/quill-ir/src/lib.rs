//! Quill Circuit Intermediate Representation
//!
//! This crate provides the operand model and the circuit container that Quill commands
//! are appended to.
//!
//! # Core Components
//!
//! - **Units**: [`Qubit`] and [`Bit`] identity tokens. Every freshly created unit is
//!   distinct from every other; canonical units ([`Qubit::canonical`]) name the
//!   operands of a boxed sub-circuit.
//! - **Angles**: [`Angle`], a constant or a named free symbol.
//! - **Native operations**: [`Op`] for primitive gates, [`QControlBox`] and [`CircBox`]
//!   handles for controlled operations and boxed sub-circuits.
//! - **Conditions**: [`ThresholdCondition`] (little-endian bit field compared with a
//!   value) and the opaque [`BitLogicExp`].
//! - **Circuit**: [`Circuit`], which owns unit registries and validates every append.
//!
//! # Example
//!
//! ```rust
//! use quill_ir::{Angle, Circuit, Op, OpType};
//!
//! let mut circuit = Circuit::new("example");
//! let q = circuit.add_qreg("q", 2);
//!
//! circuit
//!     .append_gate(Op::new(OpType::CX, vec![]).unwrap(), [q[0], q[1]], None)
//!     .unwrap()
//!     .append_gate(Op::new(OpType::Rz, vec![Angle::symbol("theta")]).unwrap(), [q[1]], None)
//!     .unwrap();
//!
//! assert_eq!(circuit.num_ops(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod angle;
pub mod circuit;
pub mod condition;
pub mod dag;
pub mod error;
pub mod instruction;
pub mod op;
pub mod unit;

pub use angle::Angle;
pub use circuit::Circuit;
pub use condition::{BitLogicExp, Condition, ThresholdCondition};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use instruction::Instruction;
pub use op::{CircBox, Op, OpType, Operation, QControlBox};
pub use unit::{
    Bit, BitRegister, Operand, OperandKind, Qubit, QubitRegister, UnitId, partition_operands,
};
