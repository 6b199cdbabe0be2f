//! Lattice Core - transaction codec and signing workflow.
//!
//! This crate provides:
//! - [`TransactionCodec`]: RLP signable payload, curve digest, sign/verify
//! - [`AccountSerializer`]: per-account locks around head/build/sign/submit
//! - [`TransactionSigner`]: the serialized signing workflow
//! - [`SignedTransactionRecord`]: the JSON submission payload
//! - Configuration and logging setup

pub mod account_lock;
pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod signer;
pub mod telemetry;

pub use account_lock::{AccountGuard, AccountSerializer};
pub use codec::TransactionCodec;
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use record::SignedTransactionRecord;
pub use signer::{ChainHeadSource, TransactionSigner, TransactionSubmitter};
pub use telemetry::init_telemetry;

pub use lattice_abi as abi;
pub use lattice_crypto as crypto;
pub use lattice_types as types;
