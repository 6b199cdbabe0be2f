use crate::address::Address;
use crate::error::TypesError;
use crate::hash::Hash;
use crate::signature::Signature;
use num_bigint::BigUint;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Transaction kind, carried on the wire as its numeric tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Value transfer to another account ("send")
    Transfer,
    /// Contract deployment
    Deploy,
    /// Contract method invocation ("execute")
    Call,
}

impl TransactionKind {
    pub const fn tag(&self) -> u8 {
        match self {
            TransactionKind::Transfer => 2,
            TransactionKind::Deploy => 4,
            TransactionKind::Call => 5,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            2 => Some(TransactionKind::Transfer),
            4 => Some(TransactionKind::Deploy),
            5 => Some(TransactionKind::Call),
            _ => None,
        }
    }

    const fn requires_linker(&self) -> bool {
        matches!(self, TransactionKind::Transfer | TransactionKind::Call)
    }
}

/// Latest accepted block of an account chain, plus the daemon block it saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ChainHead {
    pub height: u64,
    pub hash: Hash,
    pub daemon_hash: Hash,
}

impl ChainHead {
    pub const fn new(height: u64, hash: Hash, daemon_hash: Hash) -> Self {
        Self {
            height,
            hash,
            daemon_hash,
        }
    }
}

/// Unsigned transaction data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Position in the owner's account chain (head height + 1)
    pub height: u64,
    pub kind: TransactionKind,
    /// Hash of the owner's previous block
    pub parent_hash: Hash,
    /// Cross-referenced block hashes
    pub hub: Vec<Hash>,
    /// Latest daemon block seen by the owner
    pub daemon_hash: Hash,
    pub owner: Address,
    /// Counterparty: recipient or contract address
    pub linker: Address,
    pub amount: BigUint,
    /// Resource budget
    pub joule: u64,
    /// Call-data or transfer memo
    pub payload: Vec<u8>,
    /// Contract code (deployments only)
    pub code: Vec<u8>,
    /// UNIX seconds
    pub timestamp: u64,
}

impl Transaction {
    pub fn is_deploy(&self) -> bool {
        self.kind == TransactionKind::Deploy
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction {{ kind: {:?}, height: {}, owner: {}, linker: {}, amount: {} }}",
            self.kind, self.height, self.owner, self.linker, self.amount
        )
    }
}

/// Builder for all transaction kinds.
///
/// `build` consumes the builder, so one builder yields exactly one
/// transaction.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    kind: TransactionKind,
    head: Option<ChainHead>,
    owner: Option<Address>,
    linker: Option<Address>,
    amount: BigUint,
    joule: u64,
    payload: Vec<u8>,
    code: Vec<u8>,
    hub: Vec<Hash>,
    timestamp: Option<u64>,
}

impl TransactionBuilder {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            head: None,
            owner: None,
            linker: None,
            amount: BigUint::default(),
            joule: 0,
            payload: Vec::new(),
            code: Vec::new(),
            hub: Vec::new(),
            timestamp: None,
        }
    }

    pub fn transfer() -> Self {
        Self::new(TransactionKind::Transfer)
    }

    pub fn deploy() -> Self {
        Self::new(TransactionKind::Deploy)
    }

    pub fn call() -> Self {
        Self::new(TransactionKind::Call)
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Set the chain head this transaction extends.
    pub fn chain_head(mut self, head: ChainHead) -> Self {
        self.head = Some(head);
        self
    }

    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn linker(mut self, linker: Address) -> Self {
        self.linker = Some(linker);
        self
    }

    pub fn amount(mut self, amount: impl Into<BigUint>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn joule(mut self, joule: u64) -> Self {
        self.joule = joule;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn code(mut self, code: Vec<u8>) -> Self {
        self.code = code;
        self
    }

    pub fn hub(mut self, hub: Vec<Hash>) -> Self {
        self.hub = hub;
        self
    }

    /// Pin the timestamp; defaults to the current time at `build`.
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether a chain head has been supplied.
    pub fn has_chain_head(&self) -> bool {
        self.head.is_some()
    }

    /// Owner set so far, if any.
    pub fn owner_address(&self) -> Option<Address> {
        self.owner
    }

    pub fn build(self) -> Result<Transaction, TypesError> {
        let head = self.head.ok_or(TypesError::MissingField("chain_head"))?;
        let owner = self.owner.ok_or(TypesError::MissingField("owner"))?;
        let linker = match self.linker {
            Some(linker) => linker,
            None if self.kind.requires_linker() => {
                return Err(TypesError::MissingField("linker"))
            }
            None => Address::ZERO,
        };
        if self.kind == TransactionKind::Deploy && self.code.is_empty() {
            return Err(TypesError::MissingField("code"));
        }
        let height = head
            .height
            .checked_add(1)
            .ok_or(TypesError::HeightOverflow(head.height))?;

        Ok(Transaction {
            height,
            kind: self.kind,
            parent_hash: head.hash,
            hub: self.hub,
            daemon_hash: head.daemon_hash,
            owner,
            linker,
            amount: self.amount,
            joule: self.joule,
            payload: self.payload,
            code: self.code,
            timestamp: self.timestamp.unwrap_or_else(unix_now),
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Transaction with signature and digest attached.
///
/// The inner transaction is only reachable by shared reference: a signed
/// transaction cannot be edited, only rebuilt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    chain_id: u64,
    signature: Signature,
    hash: Hash,
}

impl SignedTransaction {
    pub fn new(tx: Transaction, chain_id: u64, signature: Signature, hash: Hash) -> Self {
        Self {
            tx,
            chain_id,
            signature,
            hash,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Digest that was signed
    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head() -> ChainHead {
        ChainHead::new(41, Hash::from_bytes([1u8; 32]), Hash::from_bytes([2u8; 32]))
    }

    #[test]
    fn test_build_transfer() {
        let tx = TransactionBuilder::transfer()
            .chain_head(head())
            .owner(Address::from_bytes([3u8; 20]))
            .linker(Address::from_bytes([4u8; 20]))
            .amount(1000u64)
            .timestamp(1_700_000_000)
            .build()
            .unwrap();

        assert_eq!(tx.height, 42);
        assert_eq!(tx.kind, TransactionKind::Transfer);
        assert_eq!(tx.parent_hash, Hash::from_bytes([1u8; 32]));
        assert_eq!(tx.daemon_hash, Hash::from_bytes([2u8; 32]));
        assert_eq!(tx.amount, BigUint::from(1000u64));
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert!(!tx.is_deploy());
    }

    #[test]
    fn test_missing_fields() {
        let owner = Address::from_bytes([3u8; 20]);
        assert_eq!(
            TransactionBuilder::transfer().owner(owner).build(),
            Err(TypesError::MissingField("chain_head"))
        );
        assert_eq!(
            TransactionBuilder::transfer().chain_head(head()).build(),
            Err(TypesError::MissingField("owner"))
        );
        assert_eq!(
            TransactionBuilder::call().chain_head(head()).owner(owner).build(),
            Err(TypesError::MissingField("linker"))
        );
        assert_eq!(
            TransactionBuilder::deploy().chain_head(head()).owner(owner).build(),
            Err(TypesError::MissingField("code"))
        );
    }

    #[test]
    fn test_deploy_defaults_linker_to_zero() {
        let tx = TransactionBuilder::deploy()
            .chain_head(head())
            .owner(Address::from_bytes([3u8; 20]))
            .code(vec![0x60, 0x80])
            .build()
            .unwrap();
        assert!(tx.linker.is_zero());
        assert!(tx.is_deploy());
        assert!(tx.timestamp > 0);
    }

    #[test]
    fn test_kind_tags() {
        for kind in [
            TransactionKind::Transfer,
            TransactionKind::Deploy,
            TransactionKind::Call,
        ] {
            assert_eq!(TransactionKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(TransactionKind::from_tag(0), None);
    }

    #[test]
    fn test_head_overflow_rejected() {
        let result = TransactionBuilder::transfer()
            .chain_head(ChainHead::new(u64::MAX, Hash::ZERO, Hash::ZERO))
            .owner(Address::ZERO)
            .linker(Address::ZERO)
            .build();
        assert_eq!(result, Err(TypesError::HeightOverflow(u64::MAX)));
    }
}
