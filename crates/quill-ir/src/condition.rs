//! Classical conditions for conditional operations.

use serde::Serialize;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::unit::Bit;

/// Condition comparing an ordered bit field with an integer.
///
/// The field is little-endian: `bits[i]` carries weight `2^i`, so the first bit in the
/// list is the least significant one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ThresholdCondition {
    bits: Vec<Bit>,
    value: u64,
}

impl ThresholdCondition {
    /// Create a new threshold condition.
    pub fn new(bits: impl IntoIterator<Item = Bit>, value: u64) -> Self {
        Self {
            bits: bits.into_iter().collect(),
            value,
        }
    }

    /// Get the bits of the field, least significant first.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Get the comparison value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check the condition against a bit assignment.
    ///
    /// Fields wider than 64 bits only match when every bit beyond the 64th is clear.
    pub fn is_satisfied_by(&self, mut read: impl FnMut(Bit) -> bool) -> bool {
        let mut field = 0u64;
        for (i, &bit) in self.bits.iter().enumerate() {
            if !read(bit) {
                continue;
            }
            match u32::try_from(i).ok().and_then(|shift| 1u64.checked_shl(shift)) {
                Some(weight) => field |= weight,
                None => return false,
            }
        }
        field == self.value
    }

    /// Map every bit through `f`, keeping order and value.
    #[must_use]
    pub fn map_bits(&self, f: impl FnMut(&Bit) -> Bit) -> Self {
        Self {
            bits: self.bits.iter().map(f).collect(),
            value: self.value,
        }
    }
}

/// A boolean expression over bits.
///
/// Expressions are carried unevaluated; only the referenced bits are inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BitLogicExp {
    /// A constant.
    Const(bool),
    /// The value of a bit.
    Bit(Bit),
    /// Negation.
    Not(Box<BitLogicExp>),
    /// Conjunction.
    And(Box<BitLogicExp>, Box<BitLogicExp>),
    /// Disjunction.
    Or(Box<BitLogicExp>, Box<BitLogicExp>),
    /// Exclusive or.
    Xor(Box<BitLogicExp>, Box<BitLogicExp>),
}

impl BitLogicExp {
    /// Collect the referenced bits, in first-seen order without duplicates.
    pub fn bits(&self) -> Vec<Bit> {
        let mut out = vec![];
        self.collect_bits(&mut out);
        out
    }

    /// Rename every referenced bit through `f`.
    #[must_use]
    pub fn map_bits(&self, f: &mut impl FnMut(&Bit) -> Bit) -> Self {
        match self {
            BitLogicExp::Const(v) => BitLogicExp::Const(*v),
            BitLogicExp::Bit(b) => BitLogicExp::Bit(f(b)),
            BitLogicExp::Not(e) => BitLogicExp::Not(Box::new(e.map_bits(f))),
            BitLogicExp::And(a, b) => {
                BitLogicExp::And(Box::new(a.map_bits(f)), Box::new(b.map_bits(f)))
            }
            BitLogicExp::Or(a, b) => {
                BitLogicExp::Or(Box::new(a.map_bits(f)), Box::new(b.map_bits(f)))
            }
            BitLogicExp::Xor(a, b) => {
                BitLogicExp::Xor(Box::new(a.map_bits(f)), Box::new(b.map_bits(f)))
            }
        }
    }

    fn collect_bits(&self, out: &mut Vec<Bit>) {
        match self {
            BitLogicExp::Const(_) => {}
            BitLogicExp::Bit(b) => {
                if !out.contains(b) {
                    out.push(*b);
                }
            }
            BitLogicExp::Not(e) => e.collect_bits(out),
            BitLogicExp::And(a, b) | BitLogicExp::Or(a, b) | BitLogicExp::Xor(a, b) => {
                a.collect_bits(out);
                b.collect_bits(out);
            }
        }
    }
}

impl From<Bit> for BitLogicExp {
    fn from(bit: Bit) -> Self {
        BitLogicExp::Bit(bit)
    }
}

impl From<bool> for BitLogicExp {
    fn from(value: bool) -> Self {
        BitLogicExp::Const(value)
    }
}

macro_rules! impl_bit_logic_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<R: Into<BitLogicExp>> $trait<R> for BitLogicExp {
            type Output = BitLogicExp;

            fn $method(self, rhs: R) -> BitLogicExp {
                BitLogicExp::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl<R: Into<BitLogicExp>> $trait<R> for Bit {
            type Output = BitLogicExp;

            fn $method(self, rhs: R) -> BitLogicExp {
                BitLogicExp::$variant(Box::new(self.into()), Box::new(rhs.into()))
            }
        }
    };
}

impl_bit_logic_op!(BitAnd, bitand, And);
impl_bit_logic_op!(BitOr, bitor, Or);
impl_bit_logic_op!(BitXor, bitxor, Xor);

impl Not for BitLogicExp {
    type Output = BitLogicExp;

    fn not(self) -> BitLogicExp {
        BitLogicExp::Not(Box::new(self))
    }
}

impl Not for Bit {
    type Output = BitLogicExp;

    fn not(self) -> BitLogicExp {
        BitLogicExp::Not(Box::new(self.into()))
    }
}

/// A classical condition attached to an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Condition {
    /// Execute iff the bit field equals a value.
    Threshold(ThresholdCondition),
    /// Execute iff an opaque expression holds.
    Expression(BitLogicExp),
}

impl Condition {
    /// Get the bits this condition reads.
    pub fn bits(&self) -> Vec<Bit> {
        match self {
            Condition::Threshold(t) => t.bits().to_vec(),
            Condition::Expression(e) => e.bits(),
        }
    }

    /// Rename every bit this condition reads.
    #[must_use]
    pub fn map_bits(&self, mut f: impl FnMut(&Bit) -> Bit) -> Self {
        match self {
            Condition::Threshold(t) => Condition::Threshold(t.map_bits(f)),
            Condition::Expression(e) => Condition::Expression(e.map_bits(&mut f)),
        }
    }
}

impl From<ThresholdCondition> for Condition {
    fn from(c: ThresholdCondition) -> Self {
        Condition::Threshold(c)
    }
}

impl From<BitLogicExp> for Condition {
    fn from(e: BitLogicExp) -> Self {
        Condition::Expression(e)
    }
}

impl From<Bit> for Condition {
    fn from(b: Bit) -> Self {
        Condition::Expression(BitLogicExp::Bit(b))
    }
}
