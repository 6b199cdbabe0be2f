//! Signable serialization, digests and signing of transactions.
//!
//! The signable payload is an RLP list with a fixed field order:
//!
//! ```text
//! [height, kind, parent_hash, [hub...], daemon_hash, code_hash, owner,
//!  linker, amount, joule, difficulty, pow, payload, timestamp, chain_id,
//!  0, 0]
//! ```
//!
//! `difficulty` and `pow` are always zero, and so are the two trailing
//! reserved fields. Re-encoding a signed transaction yields the same bytes
//! that were signed, so any node can recompute the digest.

use crate::error::{CoreError, CoreResult};
use alloy_rlp::{Encodable, Header};
use lattice_crypto::{provider, CryptoError, CurveProvider, KeyPair};
use lattice_types::{
    Address, Curve, Hash, PublicKey, SignedTransaction, Transaction,
};
use num_bigint::BigUint;
use std::sync::Arc;

/// Encodes, hashes and signs transactions for one chain and curve.
#[derive(Clone)]
pub struct TransactionCodec {
    chain_id: u64,
    provider: Arc<dyn CurveProvider>,
}

impl TransactionCodec {
    pub fn new(chain_id: u64, curve: Curve) -> Self {
        Self::with_provider(chain_id, provider(curve))
    }

    pub fn with_provider(chain_id: u64, provider: Arc<dyn CurveProvider>) -> Self {
        Self { chain_id, provider }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn curve(&self) -> Curve {
        self.provider.curve()
    }

    pub fn provider(&self) -> &Arc<dyn CurveProvider> {
        &self.provider
    }

    /// Hash of the contract code, or zero when the transaction has none.
    pub fn code_hash(&self, tx: &Transaction) -> Hash {
        if tx.code.is_empty() {
            Hash::ZERO
        } else {
            self.provider.digest(&tx.code)
        }
    }

    /// RLP bytes covered by the signature.
    pub fn signable_payload(&self, tx: &Transaction) -> Vec<u8> {
        encode_fields(tx, &self.code_hash(tx), self.chain_id)
    }

    /// Curve digest of [`TransactionCodec::signable_payload`].
    pub fn signable_digest(&self, tx: &Transaction) -> Hash {
        self.provider.digest(&self.signable_payload(tx))
    }

    /// Sign a built transaction, freezing its fields.
    pub fn sign(&self, tx: Transaction, key_pair: &KeyPair) -> CoreResult<SignedTransaction> {
        if key_pair.curve() != self.curve() {
            return Err(CryptoError::CurveMismatch {
                expected: self.curve(),
                actual: key_pair.curve(),
            }
            .into());
        }

        let digest = self.signable_digest(&tx);
        let signature = self.provider.sign(&digest, key_pair.secret_key())?;
        tracing::debug!(
            curve = %self.curve(),
            chain_id = self.chain_id,
            height = tx.height,
            kind = ?tx.kind,
            hash = %digest,
            "signed transaction"
        );
        Ok(SignedTransaction::new(tx, self.chain_id, signature, digest))
    }

    /// Recompute the digest from the frozen fields, compare it with the
    /// stored one, then check the signature against `public_key`.
    pub fn verify(&self, signed: &SignedTransaction, public_key: &PublicKey) -> CoreResult<()> {
        let computed = self.recompute_digest(signed)?;
        self.provider
            .verify(&computed, signed.signature(), public_key)?;
        Ok(())
    }

    /// Recover the signer and check it owns the transaction.
    ///
    /// Only curves with recoverable signatures support this.
    pub fn recover_owner(&self, signed: &SignedTransaction) -> CoreResult<Address> {
        let computed = self.recompute_digest(signed)?;
        let public_key = self
            .provider
            .recover_public_key(&computed, signed.signature().as_bytes())?;
        let recovered = self.provider.derive_address(&public_key);

        let owner = signed.transaction().owner;
        if recovered != owner {
            tracing::warn!(%owner, %recovered, "recovered signer is not the owner");
            return Err(CoreError::OwnerMismatch {
                owner: owner.to_string(),
                recovered: recovered.to_string(),
            });
        }
        Ok(recovered)
    }

    /// Signable bytes of an already signed transaction, using the chain id
    /// it was signed for.
    pub fn reserialize(&self, signed: &SignedTransaction) -> Vec<u8> {
        let tx = signed.transaction();
        encode_fields(tx, &self.code_hash(tx), signed.chain_id())
    }

    fn recompute_digest(&self, signed: &SignedTransaction) -> CoreResult<Hash> {
        let computed = self.provider.digest(&self.reserialize(signed));
        if computed != signed.hash() {
            return Err(CoreError::DigestMismatch {
                stored: signed.hash().to_hex(),
                computed: computed.to_hex(),
            });
        }
        Ok(computed)
    }
}

impl std::fmt::Debug for TransactionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCodec")
            .field("chain_id", &self.chain_id)
            .field("curve", &self.curve())
            .finish()
    }
}

fn encode_fields(tx: &Transaction, code_hash: &Hash, chain_id: u64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(256);

    tx.height.encode(&mut payload);
    tx.kind.tag().encode(&mut payload);
    put_bytes(&mut payload, tx.parent_hash.as_bytes());
    encode_hub(&tx.hub, &mut payload);
    put_bytes(&mut payload, tx.daemon_hash.as_bytes());
    put_bytes(&mut payload, code_hash.as_bytes());
    put_bytes(&mut payload, tx.owner.as_bytes());
    put_bytes(&mut payload, tx.linker.as_bytes());
    put_bytes(&mut payload, &amount_bytes(&tx.amount));
    tx.joule.encode(&mut payload);
    // difficulty, pow
    0u64.encode(&mut payload);
    0u64.encode(&mut payload);
    put_bytes(&mut payload, &tx.payload);
    tx.timestamp.encode(&mut payload);
    chain_id.encode(&mut payload);
    // reserved
    0u64.encode(&mut payload);
    0u64.encode(&mut payload);

    wrap_list(payload)
}

fn encode_hub(hub: &[Hash], out: &mut Vec<u8>) {
    let mut items = Vec::with_capacity(hub.len() * 33);
    for hash in hub {
        put_bytes(&mut items, hash.as_bytes());
    }
    out.extend_from_slice(&wrap_list(items));
}

fn wrap_list(payload: Vec<u8>) -> Vec<u8> {
    let header = Header {
        list: true,
        payload_length: payload.len(),
    };
    let mut out = Vec::with_capacity(header.length() + payload.len());
    header.encode(&mut out);
    out.extend_from_slice(&payload);
    out
}

/// RLP string item.
fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    bytes.encode(out);
}

/// Minimal big-endian bytes; zero is the empty string.
fn amount_bytes(amount: &BigUint) -> Vec<u8> {
    if amount.bits() == 0 {
        Vec::new()
    } else {
        amount.to_bytes_be()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_types::{ChainHead, TransactionBuilder};

    fn head() -> ChainHead {
        ChainHead::new(9, Hash::from_bytes([1u8; 32]), Hash::from_bytes([2u8; 32]))
    }

    fn transfer(owner: Address) -> Transaction {
        TransactionBuilder::transfer()
            .chain_head(head())
            .owner(owner)
            .linker(Address::from_bytes([7u8; 20]))
            .amount(1000u32)
            .joule(21_000)
            .timestamp(1_700_000_000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_payload_layout() {
        let codec = TransactionCodec::new(1, Curve::Secp256k1);
        let tx = transfer(Address::from_bytes([5u8; 20]));
        let payload = codec.signable_payload(&tx);

        // Long list header: 0xf8/0xf9 followed by the length.
        assert!(payload[0] >= 0xf8);
        let body = &payload[1 + (payload[0] - 0xf7) as usize..];
        // height 10, kind 2, then a 32-byte string.
        assert_eq!(&body[..3], &[0x0a, 0x02, 0xa0]);
        assert_eq!(&body[3..35], &[1u8; 32]);
        // empty hub list
        assert_eq!(body[35], 0xc0);
        // trailing chain id 1 then two reserved zeros
        assert_eq!(&payload[payload.len() - 3..], &[0x01, 0x80, 0x80]);
    }

    #[test]
    fn test_zero_amount_is_empty_string() {
        assert!(amount_bytes(&BigUint::from(0u8)).is_empty());
        assert_eq!(amount_bytes(&BigUint::from(256u32)), vec![1, 0]);
    }

    #[test]
    fn test_code_hash() {
        let codec = TransactionCodec::new(1, Curve::Sm2p256v1);
        let mut tx = transfer(Address::ZERO);
        assert_eq!(codec.code_hash(&tx), Hash::ZERO);
        tx.code = vec![0x60, 0x80];
        assert_eq!(codec.code_hash(&tx), lattice_crypto::sm3(&[0x60, 0x80]));
    }

    #[test]
    fn test_digest_uses_curve_digest() {
        let tx = transfer(Address::ZERO);
        let k1 = TransactionCodec::new(1, Curve::Secp256k1);
        let sm2 = TransactionCodec::new(1, Curve::Sm2p256v1);
        assert_eq!(
            k1.signable_digest(&tx),
            lattice_crypto::sha256(&k1.signable_payload(&tx))
        );
        assert_eq!(
            sm2.signable_digest(&tx),
            lattice_crypto::sm3(&sm2.signable_payload(&tx))
        );
    }

    #[test]
    fn test_chain_id_changes_digest() {
        let tx = transfer(Address::ZERO);
        let a = TransactionCodec::new(1, Curve::Secp256k1).signable_digest(&tx);
        let b = TransactionCodec::new(2, Curve::Secp256k1).signable_digest(&tx);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_rejects_foreign_key() {
        let codec = TransactionCodec::new(1, Curve::Secp256k1);
        let pair = provider(Curve::Sm2p256v1)
            .key_pair_from_secret(&[3u8; 32])
            .unwrap();
        let err = codec.sign(transfer(pair.address()), &pair).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Crypto(CryptoError::CurveMismatch { .. })
        ));
    }

    #[test]
    fn test_reserialize_matches_signing_input() {
        let codec = TransactionCodec::new(3, Curve::Secp256k1);
        let pair = codec.provider().key_pair_from_secret(&[9u8; 32]).unwrap();
        let tx = transfer(pair.address());
        let payload = codec.signable_payload(&tx);
        let signed = codec.sign(tx, &pair).unwrap();
        assert_eq!(codec.reserialize(&signed), payload);
    }

    #[test]
    fn test_verify_detects_tampered_digest() {
        let codec = TransactionCodec::new(1, Curve::Sm2p256v1);
        let pair = codec.provider().key_pair_from_secret(&[4u8; 32]).unwrap();
        let signed = codec.sign(transfer(pair.address()), &pair).unwrap();

        let forged = SignedTransaction::new(
            signed.transaction().clone(),
            signed.chain_id(),
            signed.signature().clone(),
            Hash::from_bytes([0xee; 32]),
        );
        assert!(matches!(
            codec.verify(&forged, pair.public_key()),
            Err(CoreError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_recover_owner_rejects_other_owner() {
        let codec = TransactionCodec::new(1, Curve::Secp256k1);
        let pair = codec.provider().key_pair_from_secret(&[6u8; 32]).unwrap();
        let signed = codec.sign(transfer(Address::from_bytes([8u8; 20])), &pair).unwrap();
        assert!(matches!(
            codec.recover_owner(&signed),
            Err(CoreError::OwnerMismatch { .. })
        ));
    }

    #[test]
    fn test_recover_owner_unsupported_on_sm2() {
        let codec = TransactionCodec::new(1, Curve::Sm2p256v1);
        let pair = codec.provider().key_pair_from_secret(&[6u8; 32]).unwrap();
        let signed = codec.sign(transfer(pair.address()), &pair).unwrap();
        assert!(matches!(
            codec.recover_owner(&signed),
            Err(CoreError::Crypto(CryptoError::RecoveryFailure(_)))
        ));
    }
}
