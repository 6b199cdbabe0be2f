use lattice_abi::AbiError;
use lattice_crypto::CryptoError;
use lattice_types::TypesError;
use thiserror::Error;

/// Errors raised by the codec and the signing workflow.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Types error: {0}")]
    Types(#[from] TypesError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    #[error("Digest mismatch: stored {stored}, computed {computed}")]
    DigestMismatch { stored: String, computed: String },

    #[error("Recovered signer {recovered} does not own the transaction (owner {owner})")]
    OwnerMismatch { owner: String, recovered: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Chain head lookup failed: {0}")]
    HeadSource(String),

    #[error("Submission failed: {0}")]
    Submit(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
