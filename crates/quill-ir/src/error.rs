//! Error types for the IR crate.

use crate::unit::Operand;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Operands not registered in the circuit.
    #[error("Operands {} not found in circuit{}", format_operands(.missing), format_gate_context(.gate_name))]
    OperandsNotFound {
        /// Every missing operand, in order of appearance.
        missing: Vec<Operand>,
        /// Optional operation name for context.
        gate_name: Option<String>,
    },

    /// The same operand appears twice in one instruction.
    #[error("Duplicate operand {operand} in operation{}", format_gate_context(.gate_name))]
    DuplicateOperand {
        /// The duplicate operand.
        operand: Operand,
        /// Optional operation name for context.
        gate_name: Option<String>,
    },

    /// Operation requires a different number of operands or parameters.
    #[error("Operation '{name}' requires {expected} {what}, got {got}")]
    ArityMismatch {
        /// Name of the operation.
        name: String,
        /// What was counted.
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        got: usize,
    },

    /// Not a valid operation in this position.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Unrecognized operand kind.
    #[error("Unknown operand kind '{0}' (expected 'qubit' or 'bit')")]
    UnknownKind(String),

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

/// Format a list of operands for error messages.
pub fn format_operands(operands: &[Operand]) -> String {
    let names: Vec<String> = operands.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
