//! secp256k1 provider (recoverable ECDSA).
//!
//! Signatures are `r || s || v` (65 bytes) with `v` the recovery id, signed
//! deterministically (RFC 6979) and normalized to low-s. Addresses hash the
//! public key with Keccak-256; transaction digests use SHA-256.

use crate::error::{ensure_curve, CryptoError};
use crate::hash::{keccak256, sha256};
use crate::keys::{KeyPair, SecretKey};
use crate::provider::{secret_from_slice, CurveProvider};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use lattice_types::{Curve, Hash, PublicKey, Signature};

/// Length of `r || s || v`.
const RECOVERABLE_LEN: usize = 65;

/// Offset added to the recovery id by legacy encoders.
const LEGACY_V_OFFSET: u8 = 27;

#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Provider;

impl Secp256k1Provider {
    fn signing_key(secret: &SecretKey) -> Result<SigningKey, CryptoError> {
        SigningKey::from_slice(secret.as_bytes())
            .map_err(|_| CryptoError::InvalidPrivateKey("scalar out of range".to_string()))
    }

    fn to_public_key(key: &VerifyingKey) -> Result<PublicKey, CryptoError> {
        let point = key.to_encoded_point(false);
        PublicKey::from_slice(Curve::Secp256k1, point.as_bytes()).map_err(CryptoError::from)
    }

    fn verifying_key(public_key: &PublicKey) -> Result<VerifyingKey, CryptoError> {
        ensure_curve(Curve::Secp256k1, public_key.curve())?;
        VerifyingKey::from_sec1_bytes(public_key.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey("point is not on secp256k1".to_string()))
    }

    /// Split a recoverable signature into the ECDSA part and recovery id.
    ///
    /// Accepts 65 bytes, or 66 bytes where the trailing remark byte is
    /// dropped first. `v` may be raw (0/1) or legacy (27/28).
    fn split_recoverable(
        signature: &[u8],
    ) -> Result<(K256Signature, RecoveryId), CryptoError> {
        let bytes = match signature.len() {
            RECOVERABLE_LEN => signature,
            len if len == RECOVERABLE_LEN + 1 => &signature[..RECOVERABLE_LEN],
            len => {
                return Err(CryptoError::InvalidSignature(format!(
                    "expected {} bytes, got {}",
                    RECOVERABLE_LEN, len
                )))
            }
        };

        let (rs, v) = bytes.split_at(64);
        let v = match v[0] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - LEGACY_V_OFFSET,
            other => {
                return Err(CryptoError::InvalidSignature(format!(
                    "invalid recovery id {}",
                    other
                )))
            }
        };
        let recovery_id = RecoveryId::from_byte(v)
            .ok_or_else(|| CryptoError::InvalidSignature(format!("invalid recovery id {}", v)))?;
        let sig = K256Signature::from_slice(rs)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok((sig, recovery_id))
    }
}

impl CurveProvider for Secp256k1Provider {
    fn curve(&self) -> Curve {
        Curve::Secp256k1
    }

    fn key_pair_from_secret(&self, secret: &[u8]) -> Result<KeyPair, CryptoError> {
        let secret = secret_from_slice(secret)?;
        let signing_key = Self::signing_key(&secret)?;
        let public = Self::to_public_key(signing_key.verifying_key())?;
        let address = self.derive_address(&public);
        Ok(KeyPair::new(secret, public, address))
    }

    fn sign(&self, hash: &Hash, secret: &SecretKey) -> Result<Signature, CryptoError> {
        let signing_key = Self::signing_key(secret)?;
        let (sig, recovery_id) = signing_key
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;

        let mut bytes = Vec::with_capacity(RECOVERABLE_LEN);
        bytes.extend_from_slice(&sig.to_bytes());
        bytes.push(recovery_id.to_byte());
        Signature::from_bytes(Curve::Secp256k1, bytes)
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))
    }

    fn recover_public_key(
        &self,
        hash: &Hash,
        signature: &[u8],
    ) -> Result<PublicKey, CryptoError> {
        let (sig, recovery_id) = Self::split_recoverable(signature)?;
        let key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &sig, recovery_id)
            .map_err(|e| CryptoError::RecoveryFailure(e.to_string()))?;
        Self::to_public_key(&key)
    }

    fn verify(
        &self,
        hash: &Hash,
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Result<(), CryptoError> {
        ensure_curve(Curve::Secp256k1, signature.curve())?;
        let key = Self::verifying_key(public_key)?;
        let (sig, _) = Self::split_recoverable(signature.as_bytes())?;
        key.verify_prehash(hash.as_bytes(), &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<PublicKey, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::InvalidPublicKey("not a secp256k1 point".to_string()))?;
        Self::to_public_key(&key)
    }

    fn compress(&self, public_key: &PublicKey) -> Result<[u8; 33], CryptoError> {
        let key = Self::verifying_key(public_key)?;
        let point = key.to_encoded_point(true);
        point
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey("compression failed".to_string()))
    }

    fn digest(&self, data: &[u8]) -> Hash {
        sha256(data)
    }

    fn address_hash(&self, data: &[u8]) -> Hash {
        keccak256(data)
    }
}
