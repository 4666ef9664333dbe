//! Content hashes used as cache keys

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// SHA-1 digest of a formula's exact text, delimiters included
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 20]);

impl ContentHash {
    /// Hash the UTF-8 bytes of `formula`
    #[must_use]
    pub fn of(formula: &str) -> Self {
        let digest = Sha1::digest(formula.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Raw digest bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex representation
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
