use thiserror::Error;

/// Errors that can occur in type operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid hash length: expected 32, got {0}")]
    InvalidHashLength(usize),

    #[error("Invalid signature length for {curve}: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        curve: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid public key length: expected {expected}, got {actual}")]
    InvalidPublicKeyLength { expected: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Unknown curve: {0}")]
    UnknownCurve(String),

    #[error("Missing transaction field: {0}")]
    MissingField(&'static str),

    #[error("Chain head height {0} cannot be extended")]
    HeightOverflow(u64),
}

impl From<hex::FromHexError> for TypesError {
    fn from(e: hex::FromHexError) -> Self {
        TypesError::InvalidHex(e.to_string())
    }
}

/// Strip an optional `0x`/`0X` prefix.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
