use crate::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A validated account name.
///
/// Surrounding whitespace is trimmed; the remaining name must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(StorefrontError::InvalidUsername)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hex-encoded SHA-256 digest of a password.
///
/// Unsalted, so the same password always yields the same digest. Existing
/// databases rely on this format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Length of the hex encoding of a SHA-256 output.
    pub const LEN: usize = 64;

    pub fn of(password: &str) -> Self {
        Self(hex::encode(Sha256::digest(password.as_bytes())))
    }

    /// Wraps a digest read back from storage.
    pub fn from_stored(stored: String) -> Result<Self> {
        if stored.len() == Self::LEN && stored.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(stored.to_ascii_lowercase()))
        } else {
            Err(StorefrontError::Corrupt(format!(
                "password digest has unexpected format ({} chars)",
                stored.len()
            )))
        }
    }

    pub fn matches(&self, password: &str) -> bool {
        *self == Self::of(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered account. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: Username,
    pub password_digest: PasswordDigest,
}
