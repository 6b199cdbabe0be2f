use lattice_types::{Curve, TypesError};
use thiserror::Error;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CryptoError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("Public key recovery failed: {0}")]
    RecoveryFailure(String),

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("RNG error: {0}")]
    RngFailure(String),

    #[error("Curve mismatch: provider is {expected}, input is {actual}")]
    CurveMismatch { expected: Curve, actual: Curve },
}

impl From<TypesError> for CryptoError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidPublicKeyLength { .. } => {
                CryptoError::InvalidPublicKey(e.to_string())
            }
            other => CryptoError::InvalidSignature(other.to_string()),
        }
    }
}

/// Reject input tagged with a different curve than the provider's.
pub(crate) fn ensure_curve(expected: Curve, actual: Curve) -> Result<(), CryptoError> {
    if expected != actual {
        return Err(CryptoError::CurveMismatch { expected, actual });
    }
    Ok(())
}
