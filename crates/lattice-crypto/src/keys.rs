use lattice_types::{Address, Curve, PublicKey};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw 32-byte private scalar. Zeroized on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    pub const LEN: usize = 32;

    pub(crate) fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Export private key bytes (CAUTION: sensitive)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// A validated private scalar together with its public point and address.
///
/// Only a curve provider can build one, so the scalar is always in
/// `(0, n)` and the point always matches it.
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
    address: Address,
}

impl KeyPair {
    pub(crate) fn new(secret: SecretKey, public: PublicKey, address: Address) -> Self {
        Self {
            secret,
            public,
            address,
        }
    }

    pub fn curve(&self) -> Curve {
        self.public.curve()
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({}, {})", self.curve(), self.address)
    }
}
