//! Concrete or symbolic angles.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A rotation angle, either a concrete value or a free symbol.
///
/// Constants compare by bit pattern, so every angle (NaN included) equals itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Angle {
    /// A constant numeric value.
    Constant(f64),
    /// A named free symbol.
    Symbol(String),
}

impl Angle {
    /// Create a constant angle.
    pub fn constant(value: f64) -> Self {
        Angle::Constant(value)
    }

    /// Create a symbolic angle.
    pub fn symbol(name: impl Into<String>) -> Self {
        Angle::Symbol(name.into())
    }

    /// The angle π.
    pub fn pi() -> Self {
        Angle::Constant(PI)
    }

    /// Check if this angle is a free symbol.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Angle::Symbol(_))
    }

    /// Get the concrete value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Angle::Constant(v) => Some(*v),
            Angle::Symbol(_) => None,
        }
    }

    /// Get the symbol name, if any.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Angle::Constant(_) => None,
            Angle::Symbol(name) => Some(name),
        }
    }

    /// Bind a symbol to a value, returning a new angle.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            Angle::Symbol(n) if n == name => Angle::Constant(value),
            _ => self.clone(),
        }
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Angle::Constant(a), Angle::Constant(b)) => a.to_bits() == b.to_bits(),
            (Angle::Symbol(a), Angle::Symbol(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Angle {}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Constant(v) => write!(f, "{v}"),
            Angle::Symbol(name) => write!(f, "{name}"),
        }
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Constant(value)
    }
}

impl From<i32> for Angle {
    fn from(value: i32) -> Self {
        Angle::Constant(f64::from(value))
    }
}

impl From<&str> for Angle {
    fn from(name: &str) -> Self {
        Angle::Symbol(name.to_string())
    }
}

impl From<String> for Angle {
    fn from(name: String) -> Self {
        Angle::Symbol(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let a = Angle::constant(1.5);
        assert!(!a.is_symbolic());
        assert_eq!(a.as_f64(), Some(1.5));
        assert_eq!(Angle::pi().as_f64(), Some(PI));
    }

    #[test]
    fn test_symbol() {
        let a = Angle::from("theta");
        assert!(a.is_symbolic());
        assert_eq!(a.as_f64(), None);
        assert_eq!(a.symbol_name(), Some("theta"));
        assert_eq!(a, Angle::symbol("theta"));
        assert_ne!(a, Angle::symbol("phi"));
    }

    #[test]
    fn test_constants_compare_by_bits() {
        assert_eq!(Angle::constant(f64::NAN), Angle::constant(f64::NAN));
        assert_eq!(Angle::from(0.25), Angle::constant(0.25));
        assert_ne!(Angle::constant(1.0), Angle::symbol("1"));
    }

    #[test]
    fn test_bind() {
        let a = Angle::symbol("theta");
        assert_eq!(a.bind("theta", 0.5), Angle::Constant(0.5));
        assert_eq!(a.bind("phi", 0.5), a);
    }
}
