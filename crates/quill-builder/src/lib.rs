//! Quill command layer
//!
//! Value types describing circuit commands, plus the machinery to reuse them.
//!
//! # Core Components
//!
//! - **Commands**: [`Command`] is a closed set of variants: [`TwoQubitGate`],
//!   [`RotationGate`], [`ControlledRotationGate`], [`Controlled`], [`CircuitBox`] and
//!   [`Conditional`]. Each one can be renamed with [`Command::sub`] and appended to a
//!   [`quill_ir::Circuit`] with [`Command::append_to`].
//! - **Templates**: [`CommandTemplate`] holds a command over placeholder operands and
//!   rebinds it by position.
//! - **Factories**: [`TemplateFactory`] runs a builder once against placeholders
//!   declared by a [`Signature`], then replays the result on every call.
//! - **Operators**: [`Operator`] is an operation without operands whose native handle
//!   is built up front; [`Operator::apply`] turns it into a command.
//!
//! # Example: A Reusable Controlled Rotation
//!
//! ```rust
//! use quill_builder::{Command, Controlled, Signature, TemplateFactory};
//! use quill_ir::{Circuit, Qubit};
//!
//! let sig: Signature = "t: qubit, c1: qubit, c2: qubit".parse().unwrap();
//! let ccrz = TemplateFactory::command("ccrz", sig, |args| {
//!     let inner = Command::crz("theta", args.qubit("t")?, args.qubit("c1")?)?;
//!     Ok(Controlled::new(inner, [args.qubit("c2")?])?.into())
//! })
//! .unwrap();
//!
//! let mut circuit = Circuit::new("main");
//! let q = circuit.add_qreg("q", 3);
//! let cmd = ccrz.call(&[q[0].into(), q[1].into(), q[2].into()]).unwrap();
//! cmd.append_to(&mut circuit).unwrap();
//!
//! assert_eq!(circuit.num_ops(), 1);
//! ```

pub mod assemble;
pub mod boxed;
pub mod command;
pub mod conditional;
pub mod error;
pub mod factory;
pub mod native;
pub mod operator;
pub mod signature;
pub mod template;

pub use assemble::{circuit_from_commands, circuit_from_operators, extend_circuit};
pub use boxed::CircuitBox;
pub use command::{
    Axis, BitMap, Command, Controlled, ControlledRotationGate, QubitMap, RotationGate,
    TwoQubitGate, TwoQubitKind,
};
pub use conditional::Conditional;
pub use error::{CommandError, CommandResult};
pub use factory::TemplateFactory;
pub use native::NativeCell;
pub use operator::{BoxOperator, Operator, QControlled};
pub use signature::{Args, Parameter, Signature};
pub use template::CommandTemplate;
