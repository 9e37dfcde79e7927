//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate for
//! reporting configuration, serialization, entropy and decryption failures.
//!
//! Decryption failures deliberately share one public message so that callers at a
//! trust boundary cannot tell a framing error from a padding error.

use std::borrow::Cow;

const COULD_NOT_DECRYPT: &str = "could not decrypt credential";

/// A specialized [`VaultError`] enum for vault-related failures.
#[skc_derive::skc_error]
pub enum VaultError {
    /// The shared secret is missing or empty, or the vault is otherwise misconfigured.
    #[public = "credential encryption is not configured"]
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The plaintext could not be encoded as JSON.
    #[public = "credential payload could not be serialized"]
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The entropy source failed. Encryption without a fresh IV is never attempted.
    #[public = "credential encryption is temporarily unavailable"]
    #[error("Randomness unavailable{}: {message}", format_context(.context))]
    RandomnessUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The blob could not be parsed into `(iv, ciphertext)`.
    #[public = COULD_NOT_DECRYPT]
    #[error("Malformed blob{}: {message}", format_context(.context))]
    MalformedBlob { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// PKCS#7 padding (CBC) or the AEAD tag (GCM) did not verify.
    ///
    /// For CBC this is only a heuristic: a wrong key or tampered ciphertext usually
    /// breaks the padding, but not always.
    #[public = COULD_NOT_DECRYPT]
    #[error("Authentication failure{}: {message}", format_context(.context))]
    Authentication { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The padding was valid but the plaintext is not UTF-8 JSON of the expected shape.
    #[public = COULD_NOT_DECRYPT]
    #[error("Decode error{}: {message}", format_context(.context))]
    Decode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VaultError {
    pub(crate) fn malformed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedBlob { message: message.into(), context: None }
    }

    pub(crate) fn decode(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decode { message: message.into(), context: None }
    }

    /// Returns `true` for failures that mean "this blob cannot be opened with this secret".
    #[must_use]
    pub const fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::MalformedBlob { .. } | Self::Authentication { .. } | Self::Decode { .. })
    }
}
