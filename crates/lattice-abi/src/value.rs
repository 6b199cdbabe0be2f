//! Loosely typed argument values accepted by the encoder.

use crate::error::AbiError;
use lattice_types::{Address, Hash};
use num_bigint::{BigInt, BigUint};
use serde_json::Value;

/// An argument before it is checked against a parameter type.
///
/// Values typically come from JSON or a command line, so text is accepted
/// for most parameter types and converted according to the target type.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Int(BigInt),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Int(_) => "integer",
            ArgValue::Float(_) => "float",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Text(_) => "text",
            ArgValue::Bytes(_) => "bytes",
            ArgValue::List(_) => "list",
        }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ArgValue::Bytes(bytes.into())
    }

    /// Convert a JSON value. Integer literals of any size become `Int`;
    /// fractional or exponent literals become `Float` and are rejected
    /// later by integer parameters.
    pub fn from_json(value: &Value) -> Result<Self, AbiError> {
        match value {
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::String(s) => Ok(ArgValue::Text(s.clone())),
            Value::Number(n) => {
                // With `arbitrary_precision` this is the literal as written.
                let text = n.to_string();
                if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
                    return Ok(ArgValue::Float(n.as_f64().unwrap_or(f64::NAN)));
                }
                BigInt::parse_bytes(text.as_bytes(), 10)
                    .map(ArgValue::Int)
                    .ok_or_else(|| AbiError::UnsupportedValue(format!("number {}", text)))
            }
            Value::Array(items) => items
                .iter()
                .map(ArgValue::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::List),
            Value::Null => Err(AbiError::UnsupportedValue("null".to_string())),
            Value::Object(_) => Err(AbiError::UnsupportedValue(
                "object (tuples are not supported)".to_string(),
            )),
        }
    }

    /// Convert a JSON array of arguments.
    pub fn list_from_json(value: &Value) -> Result<Vec<Self>, AbiError> {
        match value {
            Value::Array(items) => items.iter().map(ArgValue::from_json).collect(),
            other => Err(AbiError::UnsupportedValue(format!(
                "expected an argument array, got {}",
                other
            ))),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ArgValue {
                fn from(v: $t) -> Self {
                    ArgValue::Int(BigInt::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, BigInt, BigUint);

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Text(v)
    }
}

impl From<Address> for ArgValue {
    fn from(v: Address) -> Self {
        ArgValue::Text(v.to_hex())
    }
}

impl From<Hash> for ArgValue {
    fn from(v: Hash) -> Self {
        ArgValue::Bytes(v.as_bytes().to_vec())
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(v: Vec<T>) -> Self {
        ArgValue::List(v.into_iter().map(Into::into).collect())
    }
}
