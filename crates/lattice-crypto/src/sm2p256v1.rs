//! SM2 provider (GB/T 32918 signatures over `sm2p256v1`).
//!
//! Signatures are the 64-byte `r || s` pair with no recovery metadata.
//! The signed message is the 32-byte transaction digest, prefixed per the
//! standard with `Z_A` derived from the distinguishing identifier. Both the
//! address hash and the transaction digest are SM3.

use crate::error::{ensure_curve, CryptoError};
use crate::hash::sm3;
use crate::keys::{KeyPair, SecretKey};
use crate::provider::{secret_from_slice, CurveProvider};
use lattice_types::{Curve, Hash, PublicKey, Signature};
use signature::{Signer, Verifier};
use sm2::dsa::{Signature as Sm2Signature, SigningKey, VerifyingKey};
use sm2::elliptic_curve::sec1::ToEncodedPoint;

/// Default distinguishing identifier from GB/T 32918.
pub const DEFAULT_DIST_ID: &str = "1234567812345678";

#[derive(Debug, Clone)]
pub struct Sm2Provider {
    dist_id: String,
}

impl Sm2Provider {
    pub fn new() -> Self {
        Self::with_dist_id(DEFAULT_DIST_ID)
    }

    /// Provider using a non-default distinguishing identifier.
    pub fn with_dist_id(dist_id: impl Into<String>) -> Self {
        Self {
            dist_id: dist_id.into(),
        }
    }

    pub fn dist_id(&self) -> &str {
        &self.dist_id
    }

    fn secret_key(secret: &SecretKey) -> Result<sm2::SecretKey, CryptoError> {
        sm2::SecretKey::from_slice(secret.as_bytes())
            .map_err(|_| CryptoError::InvalidPrivateKey("scalar out of range".to_string()))
    }

    fn to_public_key(key: &sm2::PublicKey) -> Result<PublicKey, CryptoError> {
        let point = key.to_encoded_point(false);
        PublicKey::from_slice(Curve::Sm2p256v1, point.as_bytes()).map_err(CryptoError::from)
    }

    fn curve_point(public_key: &PublicKey) -> Result<sm2::PublicKey, CryptoError> {
        ensure_curve(Curve::Sm2p256v1, public_key.curve())?;
        sm2::PublicKey::from_sec1_bytes(public_key.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey("point is not on sm2p256v1".to_string()))
    }
}

impl Default for Sm2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveProvider for Sm2Provider {
    fn curve(&self) -> Curve {
        Curve::Sm2p256v1
    }

    fn key_pair_from_secret(&self, secret: &[u8]) -> Result<KeyPair, CryptoError> {
        let secret = secret_from_slice(secret)?;
        let public = Self::to_public_key(&Self::secret_key(&secret)?.public_key())?;
        let address = self.derive_address(&public);
        Ok(KeyPair::new(secret, public, address))
    }

    fn sign(&self, hash: &Hash, secret: &SecretKey) -> Result<Signature, CryptoError> {
        let signing_key = SigningKey::new(&self.dist_id, &Self::secret_key(secret)?)
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
        let sig: Sm2Signature = signing_key
            .try_sign(hash.as_bytes())
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
        Signature::from_bytes(Curve::Sm2p256v1, sig.to_bytes().to_vec())
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))
    }

    fn recover_public_key(
        &self,
        _hash: &Hash,
        _signature: &[u8],
    ) -> Result<PublicKey, CryptoError> {
        Err(CryptoError::RecoveryFailure(
            "sm2p256v1 signatures carry no recovery id".to_string(),
        ))
    }

    fn verify(
        &self,
        hash: &Hash,
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Result<(), CryptoError> {
        ensure_curve(Curve::Sm2p256v1, signature.curve())?;
        let verifying_key = VerifyingKey::new(&self.dist_id, Self::curve_point(public_key)?)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        let sig = Sm2Signature::from_slice(signature.as_bytes())
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        verifying_key
            .verify(hash.as_bytes(), &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<PublicKey, CryptoError> {
        let point = sm2::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::InvalidPublicKey("not a sm2p256v1 point".to_string()))?;
        Self::to_public_key(&point)
    }

    fn compress(&self, public_key: &PublicKey) -> Result<[u8; 33], CryptoError> {
        let point = Self::curve_point(public_key)?.to_encoded_point(true);
        point
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey("compression failed".to_string()))
    }

    fn digest(&self, data: &[u8]) -> Hash {
        sm3(data)
    }

    fn address_hash(&self, data: &[u8]) -> Hash {
        sm3(data)
    }
}
