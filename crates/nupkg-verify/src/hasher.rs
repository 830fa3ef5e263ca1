use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::Digest as _;

use crate::Result;

/// Incremental hash function.
pub trait Hasher: Send {
    /// Name recorded next to the digest, e.g. `sha512`.
    fn algorithm(&self) -> &'static str;
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> ContentHash;
}

pub struct Sha512Hasher(sha2::Sha512);

impl Hasher for Sha512Hasher {
    fn algorithm(&self) -> &'static str { "sha512" }
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> ContentHash { ContentHash(self.0.finalize().to_vec()) }
}

impl Default for Sha512Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha512Hasher {
    pub fn new() -> Self { Self(sha2::Sha512::new()) }

    pub fn digest(data: &[u8]) -> ContentHash { ContentHash(sha2::Sha512::digest(data).to_vec()) }
}

/// Raw digest bytes. Persisted and displayed as standard base64, the
/// encoding used by `.nupkg.sha512` files.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(Vec<u8>);

impl ContentHash {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        Ok(Self(STANDARD.decode(encoded.trim())?))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_base64())
    }
}
