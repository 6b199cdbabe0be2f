//! Curve provider trait and provider selection.

use crate::error::CryptoError;
use crate::keys::{KeyPair, SecretKey};
use crate::secp256k1::Secp256k1Provider;
use crate::sm2p256v1::Sm2Provider;
use lattice_types::{Address, Curve, Hash, PublicKey, Signature};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use zeroize::Zeroize;

/// Capability set of one curve family.
///
/// Implementations are stateless: no key material outlives a call.
/// Every method rejects malformed input (wrong length, off-curve point,
/// out-of-range scalar, input tagged with another curve) before doing any
/// cryptographic work.
pub trait CurveProvider: Send + Sync {
    /// The curve this provider implements.
    fn curve(&self) -> Curve;

    /// Build a key pair from a 32-byte private scalar in `(0, n)`.
    fn key_pair_from_secret(&self, secret: &[u8]) -> Result<KeyPair, CryptoError>;

    /// Sign a 32-byte digest.
    fn sign(&self, hash: &Hash, secret: &SecretKey) -> Result<Signature, CryptoError>;

    /// Recover the signer's public key from a digest and signature.
    fn recover_public_key(
        &self,
        hash: &Hash,
        signature: &[u8],
    ) -> Result<PublicKey, CryptoError>;

    /// Verify a signature over a digest.
    fn verify(
        &self,
        hash: &Hash,
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Result<(), CryptoError>;

    /// Parse a SEC1 point (33-byte compressed or 65-byte uncompressed).
    fn decompress(&self, bytes: &[u8]) -> Result<PublicKey, CryptoError>;

    /// Compress a public key to 33 bytes.
    fn compress(&self, public_key: &PublicKey) -> Result<[u8; 33], CryptoError>;

    /// Transaction digest function of this family.
    fn digest(&self, data: &[u8]) -> Hash;

    /// Hash applied to the public key coordinates when deriving an address.
    fn address_hash(&self, data: &[u8]) -> Hash;

    /// Generate a fresh random key pair.
    fn generate_key_pair(&self) -> Result<KeyPair, CryptoError> {
        loop {
            let mut bytes = [0u8; 32];
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| CryptoError::RngFailure(e.to_string()))?;
            let result = self.key_pair_from_secret(&bytes);
            bytes.zeroize();
            match result {
                Ok(pair) => return Ok(pair),
                // Scalar was zero or above the order; draw again.
                Err(CryptoError::InvalidPrivateKey(_)) => {
                    tracing::debug!(curve = %self.curve(), "rejected random scalar, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Address of a public key: the last 20 bytes of
    /// `address_hash(X || Y)` over the uncompressed point.
    fn derive_address(&self, public_key: &PublicKey) -> Address {
        let hash = self.address_hash(public_key.coordinates());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[12..]);
        Address::from_bytes(bytes)
    }
}

/// Provider for a curve family.
pub fn provider(curve: Curve) -> Arc<dyn CurveProvider> {
    match curve {
        Curve::Sm2p256v1 => Arc::new(Sm2Provider::new()),
        Curve::Secp256k1 => Arc::new(Secp256k1Provider),
    }
}

/// Check length and copy a private scalar.
pub(crate) fn secret_from_slice(secret: &[u8]) -> Result<SecretKey, CryptoError> {
    let bytes: [u8; 32] = secret.try_into().map_err(|_| {
        CryptoError::InvalidPrivateKey(format!("expected 32 bytes, got {}", secret.len()))
    })?;
    if bytes.iter().all(|&b| b == 0) {
        return Err(CryptoError::InvalidPrivateKey("scalar is zero".to_string()));
    }
    Ok(SecretKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        assert_eq!(provider(Curve::Sm2p256v1).curve(), Curve::Sm2p256v1);
        assert_eq!(provider(Curve::Secp256k1).curve(), Curve::Secp256k1);
    }

    #[test]
    fn test_secret_from_slice_rejects_bad_input() {
        assert!(matches!(
            secret_from_slice(&[1u8; 31]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            secret_from_slice(&[0u8; 32]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(secret_from_slice(&[1u8; 32]).is_ok());
    }

    #[test]
    fn test_generated_pairs_are_distinct() {
        for curve in [Curve::Sm2p256v1, Curve::Secp256k1] {
            let p = provider(curve);
            let a = p.generate_key_pair().unwrap();
            let b = p.generate_key_pair().unwrap();
            assert_ne!(a.address(), b.address());
            assert_eq!(a.curve(), curve);
            assert_eq!(p.derive_address(a.public_key()), a.address());
        }
    }
}
