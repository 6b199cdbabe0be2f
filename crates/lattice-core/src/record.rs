//! Wire record of a signed transaction, as submitted over JSON-RPC.

use crate::codec::TransactionCodec;
use lattice_types::{Address, Hash, SignedTransaction};
use serde::{Deserialize, Serialize};

/// Every signable field plus signature and digest, in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionRecord {
    pub number: u64,
    #[serde(rename = "type")]
    pub kind: u8,
    pub parent_hash: Hash,
    pub hub: Vec<Hash>,
    pub daemon_hash: Hash,
    pub code_hash: Hash,
    pub owner: Address,
    pub linker: Address,
    /// Decimal string; amounts exceed JSON number precision.
    pub amount: String,
    pub joule: u64,
    pub difficulty: u64,
    pub pow: u64,
    /// `0x` hex
    pub payload: String,
    pub timestamp: u64,
    /// Chain the signature is bound to.
    pub chain_id: u64,
    /// `0x` hex
    pub code: String,
    /// `0x` hex signature
    pub sign: String,
    pub hash: Hash,
}

impl SignedTransactionRecord {
    pub fn new(codec: &TransactionCodec, signed: &SignedTransaction) -> Self {
        let tx = signed.transaction();
        Self {
            number: tx.height,
            kind: tx.kind.tag(),
            parent_hash: tx.parent_hash,
            hub: tx.hub.clone(),
            daemon_hash: tx.daemon_hash,
            code_hash: codec.code_hash(tx),
            owner: tx.owner,
            linker: tx.linker,
            amount: tx.amount.to_str_radix(10),
            joule: tx.joule,
            difficulty: 0,
            pow: 0,
            payload: format!("0x{}", hex::encode(&tx.payload)),
            timestamp: tx.timestamp,
            chain_id: signed.chain_id(),
            code: format!("0x{}", hex::encode(&tx.code)),
            sign: signed.signature().to_hex(),
            hash: signed.hash(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
