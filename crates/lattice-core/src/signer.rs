//! Serialized "read head, build, sign, submit" workflow.

use crate::account_lock::AccountSerializer;
use crate::codec::TransactionCodec;
use crate::error::CoreResult;
use crate::record::SignedTransactionRecord;
use lattice_crypto::KeyPair;
use lattice_types::{Address, ChainHead, Hash, SignedTransaction, TransactionBuilder};
use std::sync::Arc;

/// Source of the latest accepted block of an account chain.
pub trait ChainHeadSource {
    fn chain_head(&self, chain_id: u64, address: &Address) -> CoreResult<ChainHead>;
}

/// Sink for signed transactions, returning the accepted transaction hash.
pub trait TransactionSubmitter {
    fn submit(&self, record: &SignedTransactionRecord) -> CoreResult<Hash>;
}

/// Signs transactions at the next height of their owner's chain, holding
/// the owner's account lock for the whole sequence.
#[derive(Debug, Clone)]
pub struct TransactionSigner {
    codec: TransactionCodec,
    locks: Arc<AccountSerializer>,
}

impl TransactionSigner {
    /// Signer sharing the process-wide account registry.
    pub fn new(codec: TransactionCodec) -> Self {
        Self::with_serializer(codec, AccountSerializer::global())
    }

    pub fn with_serializer(codec: TransactionCodec, locks: Arc<AccountSerializer>) -> Self {
        Self { codec, locks }
    }

    pub fn codec(&self) -> &TransactionCodec {
        &self.codec
    }

    /// Build at the current head + 1 and sign, without submitting.
    ///
    /// The builder's owner defaults to the key pair's address.
    pub fn sign_next<H>(
        &self,
        heads: &H,
        key_pair: &KeyPair,
        builder: TransactionBuilder,
    ) -> CoreResult<SignedTransaction>
    where
        H: ChainHeadSource + ?Sized,
    {
        let owner = builder.owner_address().unwrap_or_else(|| key_pair.address());
        let chain_id = self.codec.chain_id();
        self.locks.with_account(chain_id, &owner, || {
            self.build_and_sign(heads, key_pair, builder, owner)
        })
    }

    /// Build, sign and submit under the account lock. The lock is released
    /// once the submitter returns, whether it succeeded or not.
    pub fn send<H, S>(
        &self,
        heads: &H,
        submitter: &S,
        key_pair: &KeyPair,
        builder: TransactionBuilder,
    ) -> CoreResult<Hash>
    where
        H: ChainHeadSource + ?Sized,
        S: TransactionSubmitter + ?Sized,
    {
        let owner = builder.owner_address().unwrap_or_else(|| key_pair.address());
        let chain_id = self.codec.chain_id();
        let guard = self.locks.acquire(chain_id, &owner);

        let signed = self.build_and_sign(heads, key_pair, builder, owner)?;
        let record = SignedTransactionRecord::new(&self.codec, &signed);
        let result = submitter.submit(&record);
        guard.release();

        match &result {
            Ok(hash) => tracing::info!(
                chain_id,
                %owner,
                height = record.number,
                %hash,
                "transaction submitted"
            ),
            Err(e) => tracing::warn!(chain_id, %owner, height = record.number, error = %e, "submission failed"),
        }
        result
    }

    fn build_and_sign<H>(
        &self,
        heads: &H,
        key_pair: &KeyPair,
        builder: TransactionBuilder,
        owner: Address,
    ) -> CoreResult<SignedTransaction>
    where
        H: ChainHeadSource + ?Sized,
    {
        let head = heads.chain_head(self.codec.chain_id(), &owner)?;
        let tx = builder.chain_head(head).owner(owner).build()?;
        tracing::debug!(%owner, height = tx.height, kind = ?tx.kind, "built transaction");
        self.codec.sign(tx, key_pair)
    }
}
