use thiserror::Error;

/// Errors raised while parsing ABI descriptors or encoding call-data.
///
/// `arg` fields name the offending argument as `#<index> (<name>)`, with
/// `[i]` appended for array elements.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AbiError {
    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("Argument count mismatch for {method}: expected {expected}, got {actual}")]
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {arg}: expected {expected}, got {found}")]
    ArgumentTypeMismatch {
        arg: String,
        expected: String,
        found: &'static str,
    },

    #[error("Argument {arg}: value {value} overflows {ty}")]
    IntegerOverflow {
        arg: String,
        ty: String,
        value: String,
    },

    #[error("Argument {arg}: floating-point value {value} is not accepted for {ty}")]
    FloatNotSupported {
        arg: String,
        ty: String,
        value: String,
    },

    #[error("Argument {arg}: {ty} needs length {expected}, got {actual}")]
    LengthMismatch {
        arg: String,
        ty: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {arg}: invalid hex: {reason}")]
    InvalidHex { arg: String, reason: String },

    #[error("Argument {arg}: invalid address {value}")]
    InvalidAddress { arg: String, value: String },

    #[error("Argument {arg}: invalid number {value}")]
    InvalidNumber { arg: String, value: String },

    #[error("Token cannot be encoded: {0}")]
    InvalidToken(String),

    #[error("Unsupported argument value: {0}")]
    UnsupportedValue(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid ABI descriptor: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::Json(e.to_string())
    }
}
