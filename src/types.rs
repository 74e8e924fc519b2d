//! Core data types for vcd-trace
//!
//! This module contains the fundamental data structures shared by the
//! writer and reader engines.
//!
//! # Main Types
//!
//! - [`VarType`] - The declared type of a signal (`vector`, `wire`, `real`, `string`)
//! - [`VariableDecl`] - A declaration supplied by the caller before registration
//! - [`Variable`] - A registered (writer) or discovered (reader) signal
//! - [`Value`] - A decoded value: bit-vector number or symbol, real text, string
//! - [`Event`] - A single `(time, identifier, value)` change from the body
//! - [`ReadValue`] - One entry in a variable's reconstructed history

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::IdCode;
use crate::error::VcdError;

/// Type names accepted in declarations. `vector` and `wire` are both bit-vectors.
pub const SUPPORTED_TYPES: [&str; 4] = ["vector", "wire", "real", "string"];

/// Width written for `real` declarations created with [`VariableDecl::real`]
pub const REAL_WIDTH: u32 = 64;

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Vector,
    Wire,
    Real,
    String,
}

impl VarType {
    /// Get all supported variable types
    pub fn all() -> &'static [VarType] {
        &[VarType::Vector, VarType::Wire, VarType::Real, VarType::String]
    }

    /// Name used in `$var` records
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::Vector => "vector",
            VarType::Wire => "wire",
            VarType::Real => "real",
            VarType::String => "string",
        }
    }

    /// Returns true for the bit-vector family
    pub fn is_bit_vector(&self) -> bool {
        matches!(self, VarType::Vector | VarType::Wire)
    }

    fn supported_list() -> String {
        format!("[{}]", SUPPORTED_TYPES.join(" "))
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VarType {
    type Err = VcdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VarType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| VcdError::UnsupportedType {
                type_name: s.to_string(),
                supported: VarType::supported_list(),
            })
    }
}

/// A variable declaration, validated when it is registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    /// Name inside its scope (not qualified)
    pub name: String,
    /// Type name as written in the `$var` record
    pub type_name: String,
    /// Declared width; bounds the value range of bit-vectors
    pub width: u32,
}

impl VariableDecl {
    /// Create a declaration with an arbitrary type name
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            width,
        }
    }

    pub fn wire(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, "wire", width)
    }

    pub fn vector(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, "vector", width)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, "real", REAL_WIDTH)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, "string", 1)
    }
}

/// A registered variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Fully qualified, dot-joined name (`scope.sub.name`)
    pub name: String,
    pub var_type: VarType,
    pub width: u32,
    /// Short identifier used in value-change records
    pub id: IdCode,
}

impl Variable {
    /// Name without its scope path
    pub fn local_name(&self) -> &str {
        self.name.rsplit_once('.').map_or(&self.name, |(_, n)| n)
    }

    /// Scope path, if the variable is not at top level
    pub fn scope(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(s, _)| s)
    }
}

/// Join a scope path and a local name
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// Value of a bit-vector signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitValue {
    /// Known unsigned value
    Int(u128),
    /// `x`
    Unknown,
    /// `z`
    HighImpedance,
}

impl fmt::Display for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitValue::Int(v) => write!(f, "{}", v),
            BitValue::Unknown => f.write_str("x"),
            BitValue::HighImpedance => f.write_str("z"),
        }
    }
}

/// A decoded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Vector(BitValue),
    /// Real values keep their decimal text as written
    Real(String),
    Text(String),
}

impl Value {
    /// Numeric value of a known bit-vector
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Value::Vector(BitValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Real value parsed as a float, or a known bit-vector widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(text) => text.parse().ok(),
            Value::Vector(BitValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Vector(v) => v.fmt(f),
            Value::Real(text) | Value::Text(text) => f.write_str(text),
        }
    }
}

/// A single decoded value change
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: u64,
    pub id: IdCode,
    pub value: Value,
}

/// One timestamped value in a variable's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadValue {
    pub time: u64,
    pub value: Value,
}
