use crate::error::VaultError;
use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length in bytes of every key the vault derives.
pub const KEY_LEN: usize = 32;

const GCM_KEY_INFO: &[u8] = b"skc/v2/aes-256-gcm";

/// The shared secret both the encrypting service and the decrypting client hold.
///
/// The value is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wraps a secret string.
    ///
    /// # Errors
    /// Returns [`VaultError::Configuration`] if the secret is empty or only whitespace.
    pub fn new(secret: impl Into<String>) -> Result<Self, VaultError> {
        let secret = Zeroizing::new(secret.into());
        if secret.trim().is_empty() {
            return Err(VaultError::Configuration {
                message: "shared secret must not be empty".into(),
                context: None,
            });
        }
        Ok(Self(secret.as_str().to_owned()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the raw secret. Callers must not log or persist it.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

impl TryFrom<&str> for SharedSecret {
    type Error = VaultError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for SharedSecret {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for SharedSecret {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A 256-bit symmetric key. Recomputed per operation, never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(***)")
    }
}

/// Derives the AES-256-CBC key as `SHA-256(utf8(secret))`.
///
/// Deterministic and total: no salt, no iterations. This is only sound for
/// high-entropy secrets and must not be used to stretch human passwords.
#[must_use]
pub fn derive_key(secret: &SharedSecret) -> DerivedKey {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest);
    DerivedKey(key)
}

/// Derives the AES-256-GCM key with HKDF-SHA256, domain-separated from the CBC key.
pub(crate) fn derive_gcm_key(secret: &SharedSecret) -> Result<DerivedKey, VaultError> {
    let hk = Hkdf::<Sha256>::new(None, secret.as_bytes());
    let mut key = [0u8; KEY_LEN];
    hk.expand(GCM_KEY_INFO, &mut key).map_err(|_| VaultError::Internal {
        message: "HKDF expansion failed for aes-256-gcm key".into(),
        context: None,
    })?;
    Ok(DerivedKey(key))
}
