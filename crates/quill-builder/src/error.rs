//! Error types for command construction, templating and appending.

use quill_ir::error::format_operands;
use quill_ir::{IrError, Operand, OperandKind, OpType};
use thiserror::Error;

/// Errors that can occur while building, substituting or appending commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    /// Operands referenced by a command are not registered in the target circuit.
    #[error("Operands {} are not contained in circuit", format_operands(.missing))]
    OperandNotFound {
        /// Every missing operand, qubits first, in order of appearance.
        missing: Vec<Operand>,
    },

    /// Wrong number of operands or control states.
    #[error("Expected {expected} {what}, got {got}")]
    ArityMismatch {
        /// What was counted.
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        got: usize,
    },

    /// An operand occurs more than once where operands must be distinct.
    #[error("Operand {operand} is used more than once in {context}")]
    DuplicateOperand {
        /// The repeated operand.
        operand: Operand,
        /// Where the repetition happened.
        context: &'static str,
    },

    /// A builder parameter carries no qubit/bit tag.
    #[error("Parameter '{0}' must be declared as a qubit or a bit")]
    UnannotatedParameter(String),

    /// A builder parameter name is declared twice.
    #[error("Parameter '{0}' is declared more than once")]
    DuplicateParameter(String),

    /// A signature entry has a kind but no parameter name.
    #[error("Signature entry '{0}' has no parameter name")]
    UnnamedParameter(String),

    /// Substitution is not defined for this command.
    #[error("Substitution is not supported for {0}")]
    UnsupportedSubstitution(&'static str),

    /// A template's operand lists do not match the operands of its command.
    #[error("Template {kind}s must match the {kind}s of the command exactly (missing {}, unused {})", format_operands(.missing), format_operands(.unused))]
    SignatureMismatch {
        /// Kind of operand that mismatched.
        kind: OperandKind,
        /// Operands the command uses that the template does not declare.
        missing: Vec<Operand>,
        /// Operands the template declares that the command does not use.
        unused: Vec<Operand>,
    },

    /// A command cannot be nested inside another one.
    #[error("A '{}' command cannot be nested inside a '{}' command", .inner.name(), .outer.name())]
    UnsupportedNesting {
        /// The wrapping command type.
        outer: OpType,
        /// The wrapped command type.
        inner: OpType,
    },

    /// No parameter with this name is declared.
    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A declared parameter was given no operand.
    #[error("Missing operand for parameter '{0}'")]
    MissingArgument(String),

    /// An operand of the wrong kind was given for a parameter.
    #[error("Parameter '{name}' expects a {expected}, got {got}")]
    OperandKindMismatch {
        /// Parameter name.
        name: String,
        /// Declared kind.
        expected: OperandKind,
        /// Supplied operand.
        got: Operand,
    },

    /// Error reported by the target circuit.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;
