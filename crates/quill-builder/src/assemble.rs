//! Build circuits out of command sequences.

use tracing::debug;

use quill_ir::{Bit, Circuit, Qubit};

use crate::command::Command;
use crate::error::CommandResult;
use crate::operator::Operator;

/// Append `commands` to `circuit` in order.
///
/// Stops at the first failing command; commands before it stay appended.
pub fn extend_circuit<'a>(
    circuit: &mut Circuit,
    commands: impl IntoIterator<Item = &'a Command>,
) -> CommandResult<()> {
    for command in commands {
        command.append_to(circuit)?;
    }
    Ok(())
}

/// Build a circuit from `commands`, registering every unit they reference.
///
/// Units are registered in order of first appearance, qubits and bits separately.
pub fn circuit_from_commands<'a>(
    name: impl Into<String>,
    commands: impl IntoIterator<Item = &'a Command>,
) -> CommandResult<Circuit> {
    let commands: Vec<&Command> = commands.into_iter().collect();
    let mut circuit = Circuit::new(name);
    for command in &commands {
        for qubit in command.qubits() {
            circuit.add_qubit(qubit);
        }
        for bit in referenced_bits(command) {
            circuit.add_bit(bit);
        }
    }
    debug!(
        "Registered {} qubits, {} bits for {} commands",
        circuit.num_qubits(),
        circuit.num_bits(),
        commands.len()
    );

    extend_circuit(&mut circuit, commands)?;
    Ok(circuit)
}

/// Build a circuit from operators applied to operands, in order.
///
/// Each entry is an operator with the qubits and bits it is applied to.
pub fn circuit_from_operators<'a>(
    name: impl Into<String>,
    applications: impl IntoIterator<Item = (&'a Operator, &'a [Qubit], &'a [Bit])>,
) -> CommandResult<Circuit> {
    let commands = applications
        .into_iter()
        .map(|(operator, qubits, bits)| operator.apply(qubits, bits))
        .collect::<CommandResult<Vec<_>>>()?;
    circuit_from_commands(name, &commands)
}

/// Bits a command reads or writes, including those of an expression condition.
fn referenced_bits(command: &Command) -> Vec<Bit> {
    let mut bits = command.bits();
    if let Command::Conditional(c) = command {
        for bit in c.condition().bits() {
            if !bits.contains(&bit) {
                bits.push(bit);
            }
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditional::Conditional;
    use crate::error::CommandError;
    use quill_ir::OpType;

    #[test]
    fn test_circuit_from_commands() {
        let (a, b) = (Qubit::new(), Qubit::new());
        let (m0, m1) = (Bit::new(), Bit::new());
        let commands = vec![
            Command::rz(0.25, a),
            Command::cx(b, a).unwrap(),
            Conditional::expression(Command::rz(1.0, b), m0 & !m1)
                .unwrap()
                .into(),
        ];

        let circuit = circuit_from_commands("main", &commands).unwrap();
        assert_eq!(circuit.qubits(), &[a, b]);
        assert_eq!(circuit.bits(), &[m0, m1]);
        assert_eq!(circuit.num_ops(), 3);

        let types: Vec<OpType> = circuit
            .instructions()
            .map(|inst| inst.operation.op_type())
            .collect();
        assert_eq!(types, vec![OpType::Rz, OpType::CX, OpType::Rz]);
        assert!(circuit.instructions().nth(2).unwrap().is_conditional());
    }

    #[test]
    fn test_circuit_from_operators() {
        let (a, b) = (Qubit::new(), Qubit::new());
        let (cx, rz) = (Operator::cx(), Operator::rz("t"));
        let ab = [a, b];
        let ba = [b, a];
        let applications: [(&Operator, &[Qubit], &[Bit]); 3] =
            [(&cx, &ab, &[]), (&rz, &ab[..1], &[]), (&cx, &ba, &[])];

        let circuit = circuit_from_operators("ops", applications).unwrap();
        assert_eq!(circuit.qubits(), &[a, b]);
        assert_eq!(circuit.num_ops(), 3);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_extend_circuit_stops_at_first_error() {
        let (a, stranger) = (Qubit::new(), Qubit::new());
        let mut circuit = Circuit::new("c");
        circuit.add_qubit(a);

        let commands = [Command::rz(0.5, a), Command::rz(0.5, stranger)];
        let err = extend_circuit(&mut circuit, &commands).unwrap_err();
        assert!(matches!(err, CommandError::OperandNotFound { .. }));
        assert_eq!(circuit.num_ops(), 1);
    }
}
