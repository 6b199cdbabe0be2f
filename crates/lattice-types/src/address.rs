use crate::error::TypesError;
use std::fmt;
use std::str::FromStr;

/// 20-byte account address.
///
/// Text form: `zltc_` followed by base58check of the body with version byte
/// `0x01` (checksum is the first four bytes of double SHA-256).
/// Hex form: `0x` followed by 40 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);
    pub const LEN: usize = 20;

    /// Human-readable title in front of the base58check payload
    pub const TITLE: &'static str = "zltc";

    /// Base58check version byte
    pub const VERSION: u8 = 1;

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Create from a byte slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, TypesError> {
        let bytes: [u8; 20] = slice.try_into().map_err(|_| {
            TypesError::InvalidAddress(format!("expected 20 bytes, got {}", slice.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Encode as `zltc_<base58check>`.
    pub fn to_text(&self) -> String {
        let payload = bs58::encode(self.0)
            .with_check_version(Self::VERSION)
            .into_string();
        format!("{}_{}", Self::TITLE, payload)
    }

    /// Decode the `zltc_<base58check>` form.
    ///
    /// Every failure (prefix, alphabet, checksum, version, length) is reported
    /// as [`TypesError::InvalidAddress`].
    pub fn from_text(s: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidAddress(s.to_string());

        let payload = s
            .strip_prefix(Self::TITLE)
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(invalid)?;

        // The decoded vector keeps the version byte in front of the body.
        let decoded = bs58::decode(payload)
            .with_check(Some(Self::VERSION))
            .into_vec()
            .map_err(|_| invalid())?;

        match decoded.split_first() {
            Some((&Self::VERSION, body)) if body.len() == Self::LEN => {
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(body);
                Ok(Self(bytes))
            }
            _ => Err(invalid()),
        }
    }

    /// Convert to `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse `0x` + 40 hex digits.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypesError::InvalidAddress(s.to_string()))?;
        if digits.len() != Self::LEN * 2 {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(digits)
            .map_err(|_| TypesError::InvalidAddress(s.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Support both the titled text form and hex ("0x...")
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Self::from_text(s)
        }
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KNOWN_TEXT: &str = "zltc_Z1pnS94bP4hQSYLs4aP4UwBP9pH8bEvhi";
    const KNOWN_HEX: &str = "0x5f2be9a02b43f748ee460bf36eed24fafa109920";

    #[test]
    fn test_known_address_vector() {
        let from_text = Address::from_text(KNOWN_TEXT).unwrap();
        let from_hex = Address::from_hex(KNOWN_HEX).unwrap();
        assert_eq!(from_text, from_hex);
        assert_eq!(from_hex.to_text(), KNOWN_TEXT);
        assert_eq!(from_text.to_hex(), KNOWN_HEX);
    }

    #[test]
    fn test_sequential_bytes_encoding() {
        let bytes: [u8; 20] = core::array::from_fn(|i| i as u8);
        let addr = Address::from_bytes(bytes);
        assert_eq!(addr.to_text(), "zltc_QLdC8sv3XWM9QCe673k5YvCjBzTceRHcX");
    }

    #[test]
    fn test_address_zero() {
        assert_eq!(Address::ZERO.as_bytes(), &[0u8; 20]);
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::from_text(&Address::ZERO.to_text()).unwrap(), Address::ZERO);
    }

    #[test]
    fn test_from_str_accepts_both_forms() {
        let a: Address = KNOWN_TEXT.parse().unwrap();
        let b: Address = KNOWN_HEX.parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(format!("{:x}", a), KNOWN_HEX);
    }

    #[test]
    fn test_rejects_wrong_title() {
        let wrong = KNOWN_TEXT.replacen("zltc", "zltd", 1);
        assert!(matches!(
            Address::from_text(&wrong),
            Err(TypesError::InvalidAddress(_))
        ));
        assert!(Address::from_text(KNOWN_TEXT.trim_start_matches("zltc_")).is_err());
        assert!(Address::from_text("zltc").is_err());
    }

    #[test]
    fn test_rejects_corrupted_checksum() {
        // Flip one payload character.
        let mut corrupted = KNOWN_TEXT.to_string();
        corrupted.replace_range(6..7, "2");
        assert!(matches!(
            Address::from_text(&corrupted),
            Err(TypesError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let body = [7u8; 20];
        let text = format!(
            "zltc_{}",
            bs58::encode(body).with_check_version(2).into_string()
        );
        assert!(Address::from_text(&text).is_err());
    }

    #[test]
    fn test_rejects_wrong_body_length() {
        let text = format!(
            "zltc_{}",
            bs58::encode([1u8; 19]).with_check_version(1).into_string()
        );
        assert!(Address::from_text(&text).is_err());
    }

    #[test]
    fn test_hex_invalid() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("5f2be9a02b43f748ee460bf36eed24fafa109920").is_err());
        assert!(Address::from_hex("0xzz2be9a02b43f748ee460bf36eed24fafa109920").is_err());
    }

    proptest! {
        #[test]
        fn prop_text_roundtrip(bytes in any::<[u8; 20]>()) {
            let addr = Address::from_bytes(bytes);
            let text = addr.to_text();
            prop_assert!(text.starts_with("zltc_"));
            prop_assert_eq!(Address::from_text(&text).unwrap(), addr);
        }

        #[test]
        fn prop_hex_roundtrip(bytes in any::<[u8; 20]>()) {
            let addr = Address::from_bytes(bytes);
            let hex = addr.to_hex();
            prop_assert_eq!(hex.len(), 42);
            prop_assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        }
    }
}
