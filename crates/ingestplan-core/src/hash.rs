//! Plan fingerprints: blake3 over the canonical JSON encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// First 12 hex chars, enough for log lines and CLI output.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Stream `v` as JSON straight into the hasher. Struct fields serialize in
/// declaration order and plans hold no hash maps, so equal values hash equal.
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, v)?;
    Ok(Hash256(hasher.finalize().into()))
}
