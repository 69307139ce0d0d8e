//! Object ids: SHA-1 digests rendered as 40 lowercase hex characters.

use crate::error::{Error, Result};
use sha1::{Digest, Sha1};
use std::fmt;

/// Digest size in bytes (SHA-1 produces 160-bit hashes).
pub const ID_SIZE: usize = 20;

/// A 20-byte SHA-1 object id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; ID_SIZE]);

impl ObjectId {
    /// Create an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; ID_SIZE]) -> Self {
        ObjectId(bytes)
    }

    /// Create an ObjectId from a hex string (40 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != ID_SIZE * 2 {
            return Err(Error::invalid_id(format!(
                "expected {} hex characters, got {}",
                ID_SIZE * 2,
                hex_str.len()
            )));
        }

        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::invalid_id(format!("invalid hex: {}", e)))?;

        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&bytes);
        Ok(ObjectId(id))
    }

    /// Convert to hex string (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the first 2 hex characters (the fan-out directory name).
    pub fn prefix(&self) -> String {
        hex::encode(&self.0[..1])
    }

    /// Get the remaining 38 hex characters (the object file name).
    pub fn suffix(&self) -> String {
        hex::encode(&self.0[1..])
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    /// Hash raw bytes with SHA-1.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        ObjectId(hasher.finalize().into())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vectors() {
        // SHA-1 of the empty input and of "hello world"
        assert_eq!(
            ObjectId::digest(b"").to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            ObjectId::digest(b"hello world").to_hex(),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let original = ObjectId::digest(b"test data");
        let hex = original.to_hex();
        let parsed = ObjectId::from_hex(&hex).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_hex_invalid_length() {
        assert!(ObjectId::from_hex("abcd").is_err());
        assert!(ObjectId::from_hex("").is_err());
        assert!(ObjectId::from_hex(&"a".repeat(41)).is_err());
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        let invalid = "z".repeat(40);
        assert!(ObjectId::from_hex(&invalid).is_err());
    }

    #[test]
    fn test_prefix_suffix() {
        let id = ObjectId::digest(b"test");
        let prefix = id.prefix();
        let suffix = id.suffix();

        assert_eq!(prefix.len(), 2);
        assert_eq!(suffix.len(), 38);

        // Concatenated should equal full hex
        let full = format!("{}{}", prefix, suffix);
        assert_eq!(full, id.to_hex());
    }

    #[test]
    fn test_display_is_hex() {
        let id = ObjectId::digest(b"display");
        assert_eq!(format!("{}", id), id.to_hex());
        assert_eq!(id.to_hex().len(), 40);
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Hashing the same data twice always produces the same id
        #[test]
        fn prop_digest_deterministic(data: Vec<u8>) {
            let id1 = ObjectId::digest(&data);
            let id2 = ObjectId::digest(&data);
            prop_assert_eq!(id1, id2);
        }

        /// Round-trip through hex preserves the id
        #[test]
        fn prop_hex_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
            let id = ObjectId::from_bytes(bytes);
            let hex = id.to_hex();
            let parsed = ObjectId::from_hex(&hex)?;
            prop_assert_eq!(id, parsed);
        }

        /// Invalid hex length always fails
        #[test]
        fn prop_invalid_hex_length_fails(
            s in "[0-9a-f]{0,39}|[0-9a-f]{41,80}"
        ) {
            prop_assert!(ObjectId::from_hex(&s).is_err());
        }
    }
}
