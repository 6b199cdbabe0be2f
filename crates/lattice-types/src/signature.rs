use crate::error::{strip_hex_prefix, TypesError};
use std::fmt;
use std::str::FromStr;

/// Curve family governing a key, signature or address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Curve {
    /// SM2 (GB/T 32918) over `sm2p256v1`; 64-byte signatures, no recovery.
    Sm2p256v1,
    /// ECDSA over `secp256k1`; 65-byte recoverable signatures.
    Secp256k1,
}

impl Curve {
    pub const fn name(&self) -> &'static str {
        match self {
            Curve::Sm2p256v1 => "sm2p256v1",
            Curve::Secp256k1 => "secp256k1",
        }
    }

    /// Length of a signature produced on this curve.
    pub const fn signature_len(&self) -> usize {
        match self {
            Curve::Sm2p256v1 => 64,
            Curve::Secp256k1 => 65,
        }
    }

    /// Whether the public key can be recovered from a signature.
    pub const fn supports_recovery(&self) -> bool {
        matches!(self, Curve::Secp256k1)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sm2p256v1" | "sm2" => Ok(Curve::Sm2p256v1),
            "secp256k1" => Ok(Curve::Secp256k1),
            _ => Err(TypesError::UnknownCurve(s.to_string())),
        }
    }
}

/// Public key as a SEC1 uncompressed point (`0x04 || X || Y`).
///
/// The bytes are only checked for length here; the curve provider validates
/// that the point lies on the curve when it builds or decompresses a key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    curve: Curve,
    point: [u8; 65],
}

impl PublicKey {
    pub const LEN: usize = 65;

    pub const fn from_uncompressed(curve: Curve, point: [u8; 65]) -> Self {
        Self { curve, point }
    }

    pub fn from_slice(curve: Curve, slice: &[u8]) -> Result<Self, TypesError> {
        let point: [u8; 65] = slice
            .try_into()
            .map_err(|_| TypesError::InvalidPublicKeyLength {
                expected: Self::LEN,
                actual: slice.len(),
            })?;
        Ok(Self { curve, point })
    }

    pub const fn curve(&self) -> Curve {
        self.curve
    }

    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.point
    }

    /// Point coordinates without the SEC1 tag byte.
    pub fn coordinates(&self) -> &[u8] {
        &self.point[1..]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.point))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({}, 0x{}...)",
            self.curve,
            hex::encode(&self.point[..9])
        )
    }
}

/// Signature bytes with curve-specific length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    curve: Curve,
    bytes: Vec<u8>,
}

impl Signature {
    pub fn from_bytes(curve: Curve, bytes: Vec<u8>) -> Result<Self, TypesError> {
        if bytes.len() != curve.signature_len() {
            return Err(TypesError::InvalidSignatureLength {
                curve: curve.name(),
                expected: curve.signature_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { curve, bytes })
    }

    /// Parse a hex signature, with or without `0x`.
    pub fn from_hex(curve: Curve, s: &str) -> Result<Self, TypesError> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        Self::from_bytes(curve, bytes)
    }

    pub const fn curve(&self) -> Curve {
        self.curve
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Recovery id byte for recoverable signatures.
    pub fn recovery_id(&self) -> Option<u8> {
        if self.curve.supports_recovery() {
            self.bytes.last().copied()
        } else {
            None
        }
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature({}, 0x{}...)",
            self.curve,
            hex::encode(&self.bytes[..8])
        )
    }
}

impl fmt::LowerHex for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
