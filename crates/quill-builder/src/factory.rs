//! Capture a builder once, replay it many times through substitution.

use std::fmt;

use tracing::{debug, instrument};

use quill_ir::{Circuit, Operand, OperandKind, partition_operands};

use crate::boxed::CircuitBox;
use crate::command::Command;
use crate::error::{CommandError, CommandResult};
use crate::signature::{Args, Signature};
use crate::template::CommandTemplate;

/// A named, reusable command recipe.
///
/// The builder runs exactly once, at construction, against fresh placeholder
/// operands. Every later call only substitutes the captured template.
///
/// ```rust
/// use quill_builder::{Command, Signature, TemplateFactory};
/// use quill_ir::Qubit;
///
/// let sig = Signature::new().qubit("t").qubit("c");
/// let bell = TemplateFactory::circuit_box("bell", sig, |args| {
///     let (t, c) = (args.qubit("t")?, args.qubit("c")?);
///     Ok(vec![Command::rz(0.5, t), Command::cx(t, c)?])
/// })
/// .unwrap();
///
/// let (a, b) = (Qubit::new(), Qubit::new());
/// let cmd = bell.call(&[a.into(), b.into()]).unwrap();
/// assert_eq!(cmd.qubits(), vec![a, b]);
/// ```
#[derive(Clone)]
pub struct TemplateFactory {
    name: String,
    signature: Signature,
    kinds: Vec<OperandKind>,
    template: CommandTemplate,
}

impl TemplateFactory {
    /// Capture a builder returning a single command.
    ///
    /// Every declared parameter must be used by the command.
    #[instrument(skip_all, fields(params = signature.len()))]
    pub fn command<F>(name: impl Into<String>, signature: Signature, builder: F) -> CommandResult<Self>
    where
        F: FnOnce(&Args<'_>) -> CommandResult<Command>,
    {
        let name = name.into();
        let kinds = signature.kinds()?;
        let placeholders: Vec<Operand> = kinds.iter().copied().map(Operand::fresh).collect();
        let command = builder(&Args::new(&signature, &placeholders))?;

        let (qubits, bits) = partition_operands(&placeholders);
        let template = CommandTemplate::new(command, qubits, bits)?;
        debug!("Captured command template '{}': {}", name, template.command());
        Ok(Self {
            name,
            signature,
            kinds,
            template,
        })
    }

    /// Capture a builder returning a sequence of commands, boxed as one sub-circuit.
    ///
    /// The box registers qubit parameters, then bit parameters, each in declaration
    /// order, so unused parameters still belong to the box.
    #[instrument(skip_all, fields(params = signature.len()))]
    pub fn circuit_box<F, I>(
        name: impl Into<String>,
        signature: Signature,
        builder: F,
    ) -> CommandResult<Self>
    where
        F: FnOnce(&Args<'_>) -> CommandResult<I>,
        I: IntoIterator<Item = Command>,
    {
        let name = name.into();
        let kinds = signature.kinds()?;
        let placeholders: Vec<Operand> = kinds.iter().copied().map(Operand::fresh).collect();
        let (qubits, bits) = partition_operands(&placeholders);

        let mut scratch = Circuit::new(name.clone());
        for &qubit in &qubits {
            scratch.add_qubit(qubit);
        }
        for &bit in &bits {
            scratch.add_bit(bit);
        }
        for command in builder(&Args::new(&signature, &placeholders))? {
            command.append_to(&mut scratch)?;
        }

        let boxed = CircuitBox::from_circuit(&scratch)?;
        debug!(
            "Captured box template '{}': {} ops over {} qubits, {} bits",
            name,
            scratch.num_ops(),
            qubits.len(),
            bits.len()
        );
        let template = CommandTemplate::new(boxed.into(), qubits, bits)?;
        Ok(Self {
            name,
            signature,
            kinds,
            template,
        })
    }

    /// Get the factory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared parameters.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Get the captured template.
    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    /// Instantiate with operands given in declaration order.
    pub fn call(&self, operands: &[Operand]) -> CommandResult<Command> {
        if operands.len() != self.kinds.len() {
            return Err(CommandError::ArityMismatch {
                what: "operands",
                expected: self.kinds.len(),
                got: operands.len(),
            });
        }
        let params = self.signature.params();
        for ((param, &expected), &operand) in params.iter().zip(&self.kinds).zip(operands) {
            if operand.kind() != expected {
                return Err(CommandError::OperandKindMismatch {
                    name: param.name().to_string(),
                    expected,
                    got: operand,
                });
            }
        }

        let (qubits, bits) = partition_operands(operands);
        self.template.apply_to(&qubits, &bits)
    }

    /// Instantiate with operands given by parameter name.
    pub fn call_named(&self, operands: &[(&str, Operand)]) -> CommandResult<Command> {
        let params = self.signature.params();
        let mut slots: Vec<Option<Operand>> = vec![None; params.len()];
        for &(name, operand) in operands {
            let index = self
                .signature
                .position(name)
                .ok_or_else(|| CommandError::UnknownParameter(name.to_string()))?;
            if slots[index].replace(operand).is_some() {
                return Err(CommandError::DuplicateParameter(name.to_string()));
            }
        }

        let ordered = slots
            .into_iter()
            .zip(params)
            .map(|(slot, param)| {
                slot.ok_or_else(|| CommandError::MissingArgument(param.name().to_string()))
            })
            .collect::<CommandResult<Vec<_>>>()?;
        self.call(&ordered)
    }
}

impl fmt::Debug for TemplateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFactory")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("command", &self.template.command().op_type())
            .finish()
    }
}
