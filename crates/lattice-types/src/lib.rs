//! Lattice Types - Core type definitions for the Lattice codec.
//!
//! This crate provides:
//! - Addresses (20-byte, `zltc_` base58check or `0x` hex)
//! - Hashes (32-byte digests)
//! - Curve tags, public keys and signatures
//! - Transactions, the transaction builder and signed transactions

pub mod address;
pub mod hash;
pub mod signature;
pub mod transaction;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use hash::Hash;
pub use signature::{Curve, PublicKey, Signature};
pub use transaction::{
    ChainHead, SignedTransaction, Transaction, TransactionBuilder, TransactionKind,
};
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Address, ChainHead, Curve, Hash, PublicKey, Signature, SignedTransaction,
        Transaction, TransactionBuilder, TransactionKind, TypesError,
    };
}
