//! Artifact digests.

use serde::{Deserialize, Deserializer, Serialize};

/// A lowercase MD5 hex digest (32 characters).
///
/// Updaters compare this against the digest of the archive member they
/// extracted, so it is always stored lowercase and validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Md5Digest(String);

impl Md5Digest {
    /// Compute the MD5 digest of `data`.
    pub fn compute(data: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(data)))
    }

    /// Create a validated `Md5Digest` from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error string if `s` is not exactly 32 ASCII hex characters.
    pub fn new(s: &str) -> Result<Self, String> {
        if s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(format!("Invalid MD5 digest: expected 32 hex chars, got '{s}'"))
        }
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Md5Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Md5Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
