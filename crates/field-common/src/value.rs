//! Scalar metadata values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// A single metadata value.
///
/// Values are always scalars. `Missing` stands for a key whose value is
/// absent or undefined in the underlying record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    #[default]
    Missing,
}

/// Requested access type for a metadata lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Str,
    Int,
    Float,
}

impl std::str::FromStr for ValueType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "str" | "string" => Ok(ValueType::Str),
            "int" | "integer" => Ok(ValueType::Int),
            "float" | "double" => Ok(ValueType::Float),
            other => Err(MetadataError::Usage(format!("unsupported value type: {}", other))),
        }
    }
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value. Strings holding a number are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            Value::Missing => None,
        }
    }

    /// Parse a request token: integers and floats become numbers, anything
    /// else stays a string.
    pub fn from_token(token: &str) -> Value {
        let t = token.trim();
        if let Ok(i) = t.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = t.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
        Value::Str(t.to_string())
    }

    /// Best-effort conversion. Returns `None` when the value cannot be
    /// represented as `ty`.
    pub fn cast(&self, ty: ValueType) -> Option<Value> {
        match (ty, self) {
            (_, Value::Missing) => None,
            (ValueType::Str, Value::Str(s)) => Some(Value::Str(s.clone())),
            (ValueType::Str, other) => Some(Value::Str(other.to_string())),
            (ValueType::Int, Value::Int(i)) => Some(Value::Int(*i)),
            (ValueType::Int, Value::Float(f)) if f.is_finite() => Some(Value::Int(f.trunc() as i64)),
            (ValueType::Int, Value::Float(_)) => None,
            (ValueType::Int, Value::Str(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
            (ValueType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (ValueType::Float, Value::Float(f)) => Some(Value::Float(*f)),
            (ValueType::Float, Value::Str(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
        }
    }

    /// Type-tolerant equality used by selection.
    ///
    /// Numbers compare numerically across int/float, and a string holding a
    /// number matches the same number. `Missing` matches nothing.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Missing, _) | (_, Value::Missing) => false,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                cmp_int_float(*i, *f) == Ordering::Equal
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::Str(_) => 1,
            Value::Missing => 2,
        }
    }

    /// Natural ordering: numbers numerically, strings lexically, numbers
    /// before strings and `Missing` last.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(i), Value::Float(f)) => cmp_int_float(*i, *f),
            (Value::Float(f), Value::Int(i)) => cmp_int_float(*i, *f).reverse(),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer. NaN sorts after every integer, as with `f64::total_cmp`.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 as f64; every float in [-2^63, 2^63) truncates into i64 exactly.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = MetadataError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Ok(Value::Missing),
            serde_json::Value::Bool(b) => Ok(Value::Int(b as i64)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| MetadataError::InvalidValue(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            other => Err(MetadataError::InvalidValue(format!(
                "expected a scalar, got {}",
                other
            ))),
        }
    }
}
