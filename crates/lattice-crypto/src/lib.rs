//! Lattice Crypto - Curve providers and digests for the Lattice codec.
//!
//! This crate provides:
//! - The [`CurveProvider`] capability trait
//! - SM2 (`sm2p256v1`) and secp256k1 providers
//! - Key pairs with zeroized private scalars
//! - SHA-256, SM3 and Keccak-256 digests

pub mod error;
pub mod hash;
pub mod keys;
pub mod provider;
pub mod secp256k1;
pub mod sm2p256v1;

pub use error::CryptoError;
pub use hash::{keccak256, sha256, sm3};
pub use keys::{KeyPair, SecretKey};
pub use provider::{provider, CurveProvider};
pub use secp256k1::Secp256k1Provider;
pub use sm2p256v1::Sm2Provider;
