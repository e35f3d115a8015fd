//! Classically conditioned commands.

use quill_ir::{Bit, BitLogicExp, Condition, OpType, ThresholdCondition};

use crate::command::{BitMap, Command, QubitMap, sub_bit};
use crate::error::{CommandError, CommandResult};

/// A command executed only when a classical condition holds.
///
/// Threshold conditions read their bits as a little-endian field: the first bit in the
/// list is the least significant. Expression conditions are carried unevaluated and
/// cannot be rewritten by a bit substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    command: Box<Command>,
    condition: Condition,
}

impl Conditional {
    /// Condition `command` on `condition`.
    pub fn new(command: impl Into<Command>, condition: impl Into<Condition>) -> CommandResult<Self> {
        let command = command.into();
        if matches!(command, Command::Conditional(_)) {
            return Err(CommandError::UnsupportedNesting {
                outer: OpType::Conditional,
                inner: OpType::Conditional,
            });
        }
        Ok(Self {
            command: Box::new(command),
            condition: condition.into(),
        })
    }

    /// Execute `command` iff the bit field equals `value`.
    pub fn threshold(
        command: impl Into<Command>,
        bits: impl IntoIterator<Item = Bit>,
        value: u64,
    ) -> CommandResult<Self> {
        Self::new(command, ThresholdCondition::new(bits, value))
    }

    /// Execute `command` iff `expression` holds.
    pub fn expression(
        command: impl Into<Command>,
        expression: impl Into<BitLogicExp>,
    ) -> CommandResult<Self> {
        Self::new(command, Condition::Expression(expression.into()))
    }

    /// Get the conditioned command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Get the condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Bits of the command: threshold bits first, then unlisted bits of the inner command.
    ///
    /// Expression conditions contribute no bits here; the target circuit checks the
    /// bits an expression reads when the command is appended.
    pub fn bits(&self) -> Vec<Bit> {
        let mut bits = match &self.condition {
            Condition::Threshold(t) => t.bits().to_vec(),
            Condition::Expression(_) => vec![],
        };
        for bit in self.command.bits() {
            if !bits.contains(&bit) {
                bits.push(bit);
            }
        }
        bits
    }

    /// Decide whether the command runs under a bit assignment.
    ///
    /// Returns `None` for expression conditions, which are never evaluated here.
    pub fn executes_under(&self, read: impl FnMut(Bit) -> bool) -> Option<bool> {
        match &self.condition {
            Condition::Threshold(t) => Some(t.is_satisfied_by(read)),
            Condition::Expression(_) => None,
        }
    }

    pub(crate) fn sub(&self, qubit_map: &QubitMap, bit_map: &BitMap) -> CommandResult<Self> {
        let condition = match &self.condition {
            Condition::Threshold(t) => Condition::Threshold(t.map_bits(|&b| sub_bit(b, bit_map))),
            Condition::Expression(_) if !bit_map.is_empty() => {
                return Err(CommandError::UnsupportedSubstitution(
                    "bits of an expression condition",
                ));
            }
            Condition::Expression(e) => Condition::Expression(e.clone()),
        };
        Ok(Self {
            command: Box::new(self.command.sub(qubit_map, bit_map)?),
            condition,
        })
    }
}
