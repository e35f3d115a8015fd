//! Qubit and classical bit tokens.
//!
//! Units are identity tokens: a freshly created [`Qubit`] or [`Bit`] is distinct from
//! every other unit ever created in the process. Canonical units form a separate, dense
//! namespace used for the payload of boxed sub-circuits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::IrError;

static NEXT_UNIT: AtomicU64 = AtomicU64::new(0);

fn next_unit() -> u64 {
    NEXT_UNIT.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UnitId {
    /// A process-unique unit.
    Fresh(u64),
    /// The i-th unit of a canonical payload.
    Canonical(u32),
}

/// A quantum bit token.
///
/// Tokens serialize for inspection but cannot be read back, since a deserialized
/// fresh token could collide with one handed out later:
///
/// ```compile_fail
/// let q: quill_ir::Qubit = serde_json::from_str(r#"{"Fresh":0}"#).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Qubit(UnitId);

impl Qubit {
    /// Create a qubit distinct from every other qubit.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Qubit(UnitId::Fresh(next_unit()))
    }

    /// The canonical qubit at `index`.
    pub fn canonical(index: u32) -> Self {
        Qubit(UnitId::Canonical(index))
    }

    /// Get the identity of this qubit.
    #[inline]
    pub fn id(self) -> UnitId {
        self.0
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            UnitId::Fresh(n) => write!(f, "q#{n}"),
            UnitId::Canonical(i) => write!(f, "q[{i}]"),
        }
    }
}

/// A classical bit token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bit(UnitId);

impl Bit {
    /// Create a bit distinct from every other bit.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Bit(UnitId::Fresh(next_unit()))
    }

    /// The canonical bit at `index`.
    pub fn canonical(index: u32) -> Self {
        Bit(UnitId::Canonical(index))
    }

    /// Get the identity of this bit.
    #[inline]
    pub fn id(self) -> UnitId {
        self.0
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            UnitId::Fresh(n) => write!(f, "c#{n}"),
            UnitId::Canonical(i) => write!(f, "c[{i}]"),
        }
    }
}

/// The kind of an operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    /// A quantum bit.
    Qubit,
    /// A classical bit.
    Bit,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Qubit => write!(f, "qubit"),
            OperandKind::Bit => write!(f, "bit"),
        }
    }
}

impl FromStr for OperandKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qubit" => Ok(OperandKind::Qubit),
            "bit" | "clbit" => Ok(OperandKind::Bit),
            other => Err(IrError::UnknownKind(other.to_string())),
        }
    }
}

/// Either a qubit or a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operand {
    /// A quantum bit.
    Qubit(Qubit),
    /// A classical bit.
    Bit(Bit),
}

impl Operand {
    /// Get the kind of this operand.
    #[inline]
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Qubit(_) => OperandKind::Qubit,
            Operand::Bit(_) => OperandKind::Bit,
        }
    }

    /// Create a fresh operand of the given kind.
    pub fn fresh(kind: OperandKind) -> Self {
        match kind {
            OperandKind::Qubit => Operand::Qubit(Qubit::new()),
            OperandKind::Bit => Operand::Bit(Bit::new()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Qubit(q) => write!(f, "{q}"),
            Operand::Bit(b) => write!(f, "{b}"),
        }
    }
}

impl From<Qubit> for Operand {
    fn from(q: Qubit) -> Self {
        Operand::Qubit(q)
    }
}

impl From<Bit> for Operand {
    fn from(b: Bit) -> Self {
        Operand::Bit(b)
    }
}

/// Split operands into ordered qubit and bit lists.
pub fn partition_operands<'a>(
    operands: impl IntoIterator<Item = &'a Operand>,
) -> (Vec<Qubit>, Vec<Bit>) {
    let mut qubits = vec![];
    let mut bits = vec![];
    for operand in operands {
        match *operand {
            Operand::Qubit(q) => qubits.push(q),
            Operand::Bit(b) => bits.push(b),
        }
    }
    (qubits, bits)
}

/// A named group of fresh qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitRegister {
    name: String,
    qubits: Vec<Qubit>,
}

impl QubitRegister {
    /// Create a register of `size` fresh qubits.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            qubits: (0..size).map(|_| Qubit::new()).collect(),
        }
    }

    /// Get the register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Get the qubits of the register in order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }
}

impl Index<usize> for QubitRegister {
    type Output = Qubit;

    fn index(&self, index: usize) -> &Qubit {
        &self.qubits[index]
    }
}

/// A named group of fresh classical bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitRegister {
    name: String,
    bits: Vec<Bit>,
}

impl BitRegister {
    /// Create a register of `size` fresh bits.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            bits: (0..size).map(|_| Bit::new()).collect(),
        }
    }

    /// Get the register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get the bits of the register in order.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }
}

impl Index<usize> for BitRegister {
    type Output = Bit;

    fn index(&self, index: usize) -> &Bit {
        &self.bits[index]
    }
}
