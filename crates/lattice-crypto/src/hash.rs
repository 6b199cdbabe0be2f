//! Digest functions used by the curve providers.

use lattice_types::Hash;
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use sm3::Sm3;

/// SHA-256; transaction digest for secp256k1.
pub fn sha256(data: &[u8]) -> Hash {
    Hash::from_bytes(Sha256::digest(data).into())
}

/// SM3 (GB/T 32905); transaction digest and address hash for SM2.
pub fn sm3(data: &[u8]) -> Hash {
    Hash::from_bytes(Sm3::digest(data).into())
}

/// Keccak-256; address hash for secp256k1 and ABI selectors.
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::from_bytes(Keccak256::digest(data).into())
}
