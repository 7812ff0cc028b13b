//! Core value types shared by the builder, validator and loader.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::BuildError;

/// Default recursion limit for [`ValidateOptions`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalar type carried by primitive schema nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    /// Returns the `type` name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// Whether `value` has this runtime type. No coercion.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveKind::String, Value::String(_))
                | (PrimitiveKind::Number, Value::Number(_))
                | (PrimitiveKind::Boolean, Value::Bool(_))
        )
    }
}

/// A fixed scalar used by literal and enum schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(Number),
    Boolean(bool),
}

impl Literal {
    /// Reflect a dynamic value into a literal.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NonScalarLiteral` for null, arrays and objects.
    pub fn from_value(value: &Value) -> Result<Self, BuildError> {
        match value {
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Bool(b) => Ok(Literal::Boolean(*b)),
            Value::Number(n) => Ok(Literal::Number(n.clone())),
            other => Err(BuildError::NonScalarLiteral {
                actual: json_type_name(other),
            }),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Literal::String(_) => PrimitiveKind::String,
            Literal::Number(_) => PrimitiveKind::Number,
            Literal::Boolean(_) => PrimitiveKind::Boolean,
        }
    }

    /// Exact scalar equality: same type and same value.
    ///
    /// Numbers compare by numeric value, so `1` and `1.0` are equal. Two
    /// integers are compared exactly, without going through `f64`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::String(a), Value::String(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Literal::Boolean(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(n.clone()),
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    false
}

/// Convert a float to a JSON number; integral values become JSON integers.
///
/// Returns `None` for NaN and infinities, which JSON cannot represent.
pub(crate) fn finite_number(n: f64) -> Option<Number> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{}", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

macro_rules! number_literal_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )*
    };
}

number_literal_from!(i8, i16, i32, i64, u8, u16, u32, u64);

impl TryFrom<f64> for Literal {
    type Error = BuildError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        finite_number(n)
            .map(Literal::Number)
            .ok_or(BuildError::NonFiniteNumber)
    }
}

impl TryFrom<f32> for Literal {
    type Error = BuildError;

    fn try_from(n: f32) -> Result<Self, Self::Error> {
        Literal::try_from(f64::from(n))
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Literal::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Options for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Maximum nesting depth before validation gives up with an error.
    pub max_depth: usize,
    /// When true, `pattern`, `minimum` and `maximum` are checked.
    /// Off by default: these constraints are declarative only.
    pub enforce_refinements: bool,
}

impl ValidateOptions {
    /// Create options with the default depth limit and refinements off.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            enforce_refinements: false,
        }
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable `pattern`/`minimum`/`maximum` enforcement.
    pub fn enforce_refinements(mut self, enforce: bool) -> Self {
        self.enforce_refinements = enforce;
        self
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::new()
    }
}
