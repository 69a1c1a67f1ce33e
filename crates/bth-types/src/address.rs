use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A 20-byte account or contract address.
///
/// The all-zero address is reserved: registries treat it as "no address" and
/// reject it wherever a real account is required.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes.
    pub const fn from_raw(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a human label (e.g. `"alice"`).
    ///
    /// The label is hashed with BLAKE3 under a domain tag and the last 20
    /// bytes of the digest become the address.
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"bth-account-v1:");
        hasher.update(label.as_bytes());
        Self::from_digest(hasher.finalize().as_bytes())
    }

    /// Take the trailing 20 bytes of a 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&digest[12..]);
        Self(arr)
    }

    /// Returns `true` if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short form (`0x` + first 8 hex characters).
    pub fn short_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        crate::decode_fixed::<20>(s).map(Self)
    }
}

/// Interpret user input as either a hex address or an account label.
///
/// Input with a `0x` prefix must be exactly 20 bytes of valid hex. Bare input
/// of 40 hex digits is decoded as raw bytes; anything else goes through
/// [`Address::derive`].
pub fn parse_address_or_label(input: &str) -> Result<Address, TypeError> {
    match crate::parse_hex_or_label::<20>(input) {
        Some(raw) => raw.map(Address),
        None => Ok(Address::derive(input)),
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::derive("alice").is_zero());
    }

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(Address::derive("owner"), Address::derive("owner"));
        assert_ne!(Address::derive("owner"), Address::derive("admin"));
    }

    #[test]
    fn hex_roundtrip_with_and_without_prefix() {
        let addr = Address::derive("bob");
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 42);
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Address::from_hex("0xdeadbeef").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 20,
                actual: 4
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::derive("carol");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn parse_address_accepts_hex_or_label() {
        let addr = Address::derive("dave");
        assert_eq!(parse_address_or_label(&addr.to_hex()).unwrap(), addr);
        assert_eq!(parse_address_or_label(&addr.to_hex()[2..]).unwrap(), addr);
        assert_eq!(parse_address_or_label("dave").unwrap(), addr);
    }

    #[test]
    fn parse_address_rejects_malformed_prefixed_hex() {
        let truncated = &Address::derive("dave").to_hex()[..41];
        assert!(matches!(parse_address_or_label(truncated), Err(TypeError::InvalidHex(_))));
        assert!(matches!(
            parse_address_or_label("0xnothex"),
            Err(TypeError::InvalidHex(_))
        ));
    }
}
