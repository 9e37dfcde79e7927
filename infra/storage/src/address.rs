use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const ADDRESS_LEN: usize = 64;

/// Lowercase hex SHA-256 of the stored bytes.
///
/// The address is the only way to name content, so it doubles as an integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Computes the address of `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Validates an address string.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidAddress`] unless `value` is 64 lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self, StorageError> {
        let valid = value.len() == ADDRESS_LEN
            && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(value.to_owned()))
        } else {
            Err(StorageError::InvalidAddress {
                message: "expected 64 lowercase hex characters".into(),
                context: None,
            })
        }
    }

    /// Returns `true` if `bytes` hash to this address.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        *self == Self::of(bytes)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-level shard directories (`ab`, `cd`) for the filesystem layout.
    pub(crate) fn shards(&self) -> (&str, &str) {
        (&self.0[0..2], &self.0[2..4])
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentAddress {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentAddress {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentAddress> for String {
    fn from(value: ContentAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for ContentAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
