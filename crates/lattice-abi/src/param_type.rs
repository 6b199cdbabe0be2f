//! ABI type grammar.

use crate::error::AbiError;
use std::fmt;
use std::str::FromStr;

/// A parameter type the encoder can handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `uint<bits>`
    Uint(usize),
    /// `int<bits>`
    Int(usize),
    Address,
    Bool,
    String,
    /// Dynamic `bytes`
    Bytes,
    /// `bytes<N>`, 1..=32 (`hash` is `bytes32`)
    FixedBytes(usize),
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Whether values of this type live in the tail section.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Bytes | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Canonical name used in method signatures.
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Uint(bits) => format!("uint{}", bits),
            ParamType::Int(bits) => format!("int{}", bits),
            ParamType::Address => "address".to_string(),
            ParamType::Bool => "bool".to_string(),
            ParamType::String => "string".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::FixedBytes(len) => format!("bytes{}", len),
            ParamType::Array(inner) => format!("{}[]", inner.canonical()),
            ParamType::FixedArray(inner, len) => format!("{}[{}]", inner.canonical(), len),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unsupported = || AbiError::UnsupportedType(s.to_string());

        if let Some(body) = s.strip_suffix(']') {
            let open = body.rfind('[').ok_or_else(unsupported)?;
            let inner: ParamType = body[..open].parse()?;
            let size = &body[open + 1..];
            if size.is_empty() {
                return Ok(ParamType::Array(Box::new(inner)));
            }
            return match size.parse::<usize>() {
                Ok(len) if len > 0 => Ok(ParamType::FixedArray(Box::new(inner), len)),
                _ => Err(unsupported()),
            };
        }

        // Tuples, fixed-point and function pointers are outside this codec.
        if s.starts_with('(')
            || s.starts_with("tuple")
            || s.starts_with("fixed")
            || s.starts_with("ufixed")
            || s == "function"
        {
            return Err(unsupported());
        }

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "hash" => return Ok(ParamType::FixedBytes(32)),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            _ => {}
        }

        if let Some(bits) = s.strip_prefix("uint") {
            return parse_bits(bits).map(ParamType::Uint).ok_or_else(unsupported);
        }
        if let Some(bits) = s.strip_prefix("int") {
            return parse_bits(bits).map(ParamType::Int).ok_or_else(unsupported);
        }
        if let Some(len) = s.strip_prefix("bytes") {
            return match len.parse::<usize>() {
                Ok(len @ 1..=32) => Ok(ParamType::FixedBytes(len)),
                _ => Err(unsupported()),
            };
        }

        Err(unsupported())
    }
}

fn parse_bits(bits: &str) -> Option<usize> {
    match bits.parse::<usize>() {
        Ok(n) if n > 0 && n <= 256 && n % 8 == 0 => Some(n),
        _ => None,
    }
}
