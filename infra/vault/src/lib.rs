//! Credential encryption for SkillChain Passport.
//!
//! The vault turns any JSON-serializable value into a self-contained
//! [`CiphertextBlob`] and back, given the shared secret.
//!
//! ## Key Derivation
//!
//! The AES-256-CBC key is `SHA-256(utf8(secret))`: no salt, no iterations. It is
//! deterministic so that independently written decrypters derive the same key from
//! the same secret. It is **not** a password hash; the secret must be high-entropy.
//!
//! ## Modes
//!
//! * **v1, `aes-256-cbc`** (default): PKCS#7 padding, fresh 16-byte IV. Decryption
//!   failures are only detected heuristically through the padding check.
//! * **v2, `aes-256-gcm`**: 12-byte nonce, 16-byte tag, key derived with
//!   HKDF-SHA256 (`info = "skc/v2/aes-256-gcm"`). Tampering is always detected.
//!
//! The mode of a blob travels with it, so one vault reads both versions.
//!
//! ## Wire Forms
//!
//! ```text
//! {"v":1,"alg":"aes-256-cbc","iv":"<32 hex>","data":"<hex>"}   canonical
//! {"iv":"<32 hex>","data":"<hex>"}                              legacy record, read as v1
//! <32 hex iv><hex ciphertext>                                   legacy concatenated, read as v1
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use skc_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let payload = serde_json::json!({
//!     "holder": "0xABC",
//!     "issuer": "0xDEF",
//!     "credential": { "type": "degree", "title": "B.Tech" }
//! });
//!
//! let blob = skc_vault::encrypt(&payload, "test-secret-value")?;
//! assert_eq!(hex::encode(blob.iv()).len(), 32);
//!
//! let wire = blob.to_json();
//! let parsed: CiphertextBlob = wire.parse()?;
//! assert_eq!(skc_vault::decrypt(&parsed, "test-secret-value")?, payload);
//! # Ok(())
//! # }
//! ```

mod blob;
mod builder;
mod engine;
mod entropy;
mod error;
mod finite;
mod secret;

pub use blob::{CipherMode, CiphertextBlob};
pub use builder::{NoSecret, VaultBuilder, WithSecret};
pub use engine::{Vault, decrypt, encrypt};
pub use entropy::{EntropySource, SystemEntropy};
pub use error::{VaultError, VaultErrorExt};
pub use secret::{DerivedKey, KEY_LEN, SharedSecret, derive_key};

pub mod prelude {
    pub use crate::blob::{CipherMode, CiphertextBlob};
    pub use crate::engine::Vault;
    pub use crate::entropy::EntropySource;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::secret::SharedSecret;
}
