//! Explicit operand schemas for template builders.

use std::fmt;
use std::str::FromStr;

use quill_ir::{Bit, Operand, OperandKind, Qubit};

use crate::error::{CommandError, CommandResult};

/// One declared builder parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    kind: Option<OperandKind>,
}

impl Parameter {
    /// A qubit parameter.
    pub fn qubit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(OperandKind::Qubit),
        }
    }

    /// A bit parameter.
    pub fn bit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(OperandKind::Bit),
        }
    }

    /// A parameter without a kind. Factories reject it.
    pub fn untagged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// Get the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared kind.
    pub fn kind(&self) -> Option<OperandKind> {
        self.kind
    }
}

/// Ordered list of builder parameters.
///
/// ```rust
/// use quill_builder::Signature;
///
/// let fluent = Signature::new().qubit("t").qubit("c").bit("m");
/// let parsed: Signature = "t: qubit, c: qubit, m: bit".parse().unwrap();
/// assert_eq!(fluent, parsed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a qubit parameter.
    #[must_use]
    pub fn qubit(self, name: impl Into<String>) -> Self {
        self.param(Parameter::qubit(name))
    }

    /// Append a bit parameter.
    #[must_use]
    pub fn bit(self, name: impl Into<String>) -> Self {
        self.param(Parameter::bit(name))
    }

    /// Append any parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Get the parameters in declaration order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Get the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Find the position of a parameter.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Get the kind of every parameter, failing on untagged or repeated names.
    pub fn kinds(&self) -> CommandResult<Vec<OperandKind>> {
        let mut kinds = Vec::with_capacity(self.params.len());
        for (i, param) in self.params.iter().enumerate() {
            let kind = param
                .kind
                .ok_or_else(|| CommandError::UnannotatedParameter(param.name.clone()))?;
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(CommandError::DuplicateParameter(param.name.clone()));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }
}

impl FromStr for Signature {
    type Err = CommandError;

    /// Parse `"name: kind, ..."`. A parameter without a recognised kind is kept untagged.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut signature = Signature::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, kind) = match entry.split_once(':') {
                Some((name, kind)) => (name.trim(), kind.parse::<OperandKind>().ok()),
                None => (entry, None),
            };
            if name.is_empty() {
                return Err(CommandError::UnnamedParameter(entry.to_string()));
            }
            signature.params.push(Parameter {
                name: name.to_string(),
                kind,
            });
        }
        Ok(signature)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .params
            .iter()
            .map(|p| match p.kind {
                Some(kind) => format!("{}: {kind}", p.name),
                None => p.name.clone(),
            })
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}

/// The operands handed to a template builder, one per declared parameter.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    signature: &'a Signature,
    operands: &'a [Operand],
}

impl<'a> Args<'a> {
    pub(crate) fn new(signature: &'a Signature, operands: &'a [Operand]) -> Self {
        Self {
            signature,
            operands,
        }
    }

    fn lookup(&self, name: &str) -> CommandResult<Operand> {
        self.signature
            .position(name)
            .and_then(|i| self.operands.get(i).copied())
            .ok_or_else(|| CommandError::UnknownParameter(name.to_string()))
    }

    /// Get the qubit bound to `name`.
    pub fn qubit(&self, name: &str) -> CommandResult<Qubit> {
        match self.lookup(name)? {
            Operand::Qubit(q) => Ok(q),
            other => Err(CommandError::OperandKindMismatch {
                name: name.to_string(),
                expected: OperandKind::Qubit,
                got: other,
            }),
        }
    }

    /// Get the bit bound to `name`.
    pub fn bit(&self, name: &str) -> CommandResult<Bit> {
        match self.lookup(name)? {
            Operand::Bit(b) => Ok(b),
            other => Err(CommandError::OperandKindMismatch {
                name: name.to_string(),
                expected: OperandKind::Bit,
                got: other,
            }),
        }
    }

    /// Get the operand at a declaration position.
    pub fn get(&self, index: usize) -> Option<Operand> {
        self.operands.get(index).copied()
    }

    /// Get every operand in declaration order.
    pub fn operands(&self) -> &'a [Operand] {
        self.operands
    }

    /// Get the qubit operands in declaration order.
    pub fn qubits(&self) -> Vec<Qubit> {
        quill_ir::partition_operands(self.operands).0
    }

    /// Get the bit operands in declaration order.
    pub fn bits(&self) -> Vec<Bit> {
        quill_ir::partition_operands(self.operands).1
    }
}
