//! Commands over placeholder operands, reusable through substitution.

use rustc_hash::FxHashSet;
use tracing::trace;

use quill_ir::{Bit, Condition, Operand, OperandKind, Qubit};

use crate::command::{BitMap, Command, QubitMap, ensure_distinct};
use crate::error::{CommandError, CommandResult};

/// Compare the operands a command uses with the operands a template declares.
fn check_signature<T>(kind: OperandKind, declared: &[T], used: Vec<T>) -> CommandResult<()>
where
    T: Into<Operand> + Copy + Eq + std::hash::Hash,
{
    let declared_set: FxHashSet<T> = declared.iter().copied().collect();
    let used_set: FxHashSet<T> = used.iter().copied().collect();
    if declared_set == used_set {
        return Ok(());
    }

    let mut missing: Vec<Operand> = vec![];
    for operand in used {
        if !declared_set.contains(&operand) && !missing.contains(&operand.into()) {
            missing.push(operand.into());
        }
    }
    let unused = declared
        .iter()
        .filter(|operand| !used_set.contains(*operand))
        .map(|&operand| operand.into())
        .collect();
    Err(CommandError::SignatureMismatch {
        kind,
        missing,
        unused,
    })
}

/// A command built over placeholder operands.
///
/// The placeholder lists are duplicate-free and contain exactly the operands the
/// command references. [`CommandTemplate::apply_to`] binds the placeholders to real
/// operands by position.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTemplate {
    qubits: Vec<Qubit>,
    bits: Vec<Bit>,
    command: Command,
}

impl CommandTemplate {
    /// Create a template, checking the placeholders against the command.
    pub fn new(
        command: Command,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
    ) -> CommandResult<Self> {
        let qubits: Vec<Qubit> = qubits.into_iter().collect();
        let bits: Vec<Bit> = bits.into_iter().collect();
        ensure_distinct(qubits.iter().copied(), "template qubits")?;
        ensure_distinct(bits.iter().copied(), "template bits")?;
        check_signature(OperandKind::Qubit, &qubits, command.qubits())?;
        // Binding any bit would rewrite the expression's bits.
        if let Command::Conditional(c) = &command {
            if matches!(c.condition(), Condition::Expression(_)) && !bits.is_empty() {
                return Err(CommandError::UnsupportedSubstitution(
                    "bits of an expression condition",
                ));
            }
        }
        check_signature(OperandKind::Bit, &bits, command.bits())?;
        Ok(Self {
            qubits,
            bits,
            command,
        })
    }

    /// Get the placeholder qubits.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the placeholder bits.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Get the command over placeholders.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Bind the placeholders to `qubits` and `bits`, position by position.
    pub fn apply_to(&self, qubits: &[Qubit], bits: &[Bit]) -> CommandResult<Command> {
        if qubits.len() != self.qubits.len() {
            return Err(CommandError::ArityMismatch {
                what: "template qubits",
                expected: self.qubits.len(),
                got: qubits.len(),
            });
        }
        if bits.len() != self.bits.len() {
            return Err(CommandError::ArityMismatch {
                what: "template bits",
                expected: self.bits.len(),
                got: bits.len(),
            });
        }

        let qubit_map: QubitMap = self
            .qubits
            .iter()
            .copied()
            .zip(qubits.iter().copied())
            .collect();
        let bit_map: BitMap = self.bits.iter().copied().zip(bits.iter().copied()).collect();
        trace!(
            op = self.command.op_type().name(),
            qubits = qubits.len(),
            bits = bits.len(),
            "apply template"
        );
        self.command.sub(&qubit_map, &bit_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Controlled, RotationGate};
    use crate::conditional::Conditional;
    use quill_ir::Angle;

    fn qubits<const N: usize>() -> [Qubit; N] {
        std::array::from_fn(|_| Qubit::new())
    }

    #[test]
    fn test_controlled_template() {
        let [p0, p1, p2, a, b, c] = qubits();
        let angle = Angle::symbol("theta");
        let template = CommandTemplate::new(
            Controlled::new(RotationGate::rz(angle.clone(), p0), [p1, p2])
                .unwrap()
                .into(),
            [p0, p1, p2],
            [],
        )
        .unwrap();

        let bound = template.apply_to(&[a, b, c], &[]).unwrap();
        let expected: Command = Controlled::new(RotationGate::rz(angle, a), [b, c])
            .unwrap()
            .into();
        assert_eq!(bound, expected);
    }

    #[test]
    fn test_apply_to_is_repeatable() {
        let [p0, p1, a, b] = qubits();
        let template = CommandTemplate::new(Command::cx(p0, p1).unwrap(), [p0, p1], []).unwrap();
        let first = template.apply_to(&[a, b], &[]).unwrap();
        let second = template.apply_to(&[a, b], &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(template.command(), &Command::cx(p0, p1).unwrap());
    }

    #[test]
    fn test_apply_to_arity() {
        let [p0, p1, a] = qubits();
        let c = Bit::new();
        let template = CommandTemplate::new(Command::cx(p0, p1).unwrap(), [p0, p1], []).unwrap();

        assert!(matches!(
            template.apply_to(&[a], &[]),
            Err(CommandError::ArityMismatch {
                what: "template qubits",
                expected: 2,
                got: 1
            })
        ));
        assert!(matches!(
            template.apply_to(&[a, p1], &[c]),
            Err(CommandError::ArityMismatch {
                what: "template bits",
                expected: 0,
                got: 1
            })
        ));
    }

    #[test]
    fn test_signature_mismatch() {
        let [p0, p1, extra] = qubits();
        let err = CommandTemplate::new(Command::cx(p0, p1).unwrap(), [p0, extra], []).unwrap_err();
        match err {
            CommandError::SignatureMismatch {
                kind,
                missing,
                unused,
            } => {
                assert_eq!(kind, OperandKind::Qubit);
                assert_eq!(missing, vec![Operand::Qubit(p1)]);
                assert_eq!(unused, vec![Operand::Qubit(extra)]);
            }
            other => panic!("Expected SignatureMismatch, got {other:?}"),
        }

        let c0 = Bit::new();
        let cond = Conditional::threshold(Command::cx(p0, p1).unwrap(), [c0], 1).unwrap();
        assert!(matches!(
            CommandTemplate::new(cond.into(), [p0, p1], []),
            Err(CommandError::SignatureMismatch {
                kind: OperandKind::Bit,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_placeholders() {
        let [p0, p1] = qubits();
        assert!(matches!(
            CommandTemplate::new(Command::cx(p0, p1).unwrap(), [p0, p1, p0], []),
            Err(CommandError::DuplicateOperand { .. })
        ));
    }

    #[test]
    fn test_conditional_template_binds_bits() {
        let [p0, p1, a, b] = qubits();
        let [m, x] = std::array::from_fn(|_| Bit::new());
        let template = CommandTemplate::new(
            Conditional::threshold(Command::cx(p0, p1).unwrap(), [m], 1)
                .unwrap()
                .into(),
            [p0, p1],
            [m],
        )
        .unwrap();

        let bound = template.apply_to(&[a, b], &[x]).unwrap();
        assert_eq!(bound.qubits(), vec![a, b]);
        assert_eq!(bound.bits(), vec![x]);
    }
}
