use aes::Aes256;
use aes_gcm::Aes256Gcm;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::blob::{CipherMode, CiphertextBlob};
use crate::builder::VaultBuilder;
use crate::entropy::EntropySource;
use crate::error::{VaultError, VaultErrorExt};
use crate::finite::ensure_finite;
use crate::secret::{DerivedKey, SharedSecret, derive_gcm_key, derive_key};

type CbcEncryptor = cbc::Encryptor<Aes256>;
type CbcDecryptor = cbc::Decryptor<Aes256>;

const GCM_AAD: &[u8] = b"skc.blob.v2:aes-256-gcm";

#[derive(Debug)]
pub(crate) struct VaultInner {
    pub(crate) secret: SharedSecret,
    pub(crate) mode: CipherMode,
    pub(crate) entropy: Box<dyn EntropySource>,
}

/// Thread-safe handle for credential encryption.
///
/// `Vault` wraps immutable state in an [`Arc`]; clones are cheap and can be shared
/// across tasks. Every call derives the key afresh and draws a new IV, so the
/// handle itself carries no per-call state.
///
/// ### Example
/// ```rust
/// use skc_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let vault = Vault::builder().secret("test-secret-value")?.build();
///
/// let blob = vault.encrypt(&serde_json::json!({ "holder": "0xABC" }))?;
/// assert_eq!(blob.iv().len(), 16);
///
/// let opened = vault.decrypt_str(&blob.to_json())?;
/// assert_eq!(opened["holder"], "0xABC");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Vault {
    pub(crate) inner: Arc<VaultInner>,
}

impl Vault {
    #[must_use]
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    /// Mode used for newly encrypted blobs.
    #[must_use]
    pub fn mode(&self) -> CipherMode {
        self.inner.mode
    }

    /// Serializes `plaintext` to JSON and encrypts it.
    ///
    /// # Errors
    /// * [`VaultError::Serialization`] If the value cannot be represented as JSON,
    ///   including `NaN` and infinite floats.
    /// * [`VaultError::RandomnessUnavailable`] If no IV could be drawn.
    pub fn encrypt<T: Serialize + ?Sized>(&self, plaintext: &T) -> Result<CiphertextBlob, VaultError> {
        ensure_finite(plaintext).context("Serializing credential payload")?;
        let json = Zeroizing::new(
            serde_json::to_vec(plaintext).context("Serializing credential payload")?,
        );
        self.encrypt_bytes(&json)
    }

    /// Encrypts raw bytes with the configured mode.
    ///
    /// # Errors
    /// * [`VaultError::RandomnessUnavailable`] If no IV could be drawn.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<CiphertextBlob, VaultError> {
        self.encrypt_bytes_with(self.inner.mode, plaintext)
    }

    /// Encrypts raw bytes with an explicit mode, overriding the configured one.
    ///
    /// # Errors
    /// * [`VaultError::RandomnessUnavailable`] If no IV could be drawn.
    pub fn encrypt_bytes_with(
        &self,
        mode: CipherMode,
        plaintext: &[u8],
    ) -> Result<CiphertextBlob, VaultError> {
        let iv = self.next_iv(mode)?;
        let data = match mode {
            CipherMode::Cbc => seal_cbc(&derive_key(&self.inner.secret), &iv, plaintext)?,
            CipherMode::Gcm => seal_gcm(&derive_gcm_key(&self.inner.secret)?, &iv, plaintext)?,
        };
        CiphertextBlob::from_parts(mode, iv, data)
    }

    /// Decrypts a blob into a JSON value.
    ///
    /// # Errors
    /// * [`VaultError::Authentication`] If the padding or tag does not verify.
    /// * [`VaultError::Decode`] If the plaintext is not UTF-8 JSON.
    pub fn decrypt(&self, blob: &CiphertextBlob) -> Result<Value, VaultError> {
        self.decrypt_as(blob)
    }

    /// Decrypts a blob and deserializes it into `T`.
    ///
    /// # Errors
    /// * [`VaultError::Authentication`] If the padding or tag does not verify.
    /// * [`VaultError::Decode`] If the plaintext is not UTF-8 JSON of shape `T`.
    pub fn decrypt_as<T: DeserializeOwned>(&self, blob: &CiphertextBlob) -> Result<T, VaultError> {
        let plaintext = self.decrypt_bytes(blob)?;
        let text = std::str::from_utf8(&plaintext)
            .map_err(|e| VaultError::decode(format!("plaintext is not UTF-8: {e}")))?;
        serde_json::from_str(text)
            .map_err(|e| VaultError::decode(format!("plaintext is not the expected JSON: {e}")))
    }

    /// Parses any accepted wire form and decrypts it.
    ///
    /// # Errors
    /// * [`VaultError::MalformedBlob`] If the input matches no wire form.
    /// * Any error of [`Vault::decrypt`].
    pub fn decrypt_str(&self, input: &str) -> Result<Value, VaultError> {
        self.decrypt(&CiphertextBlob::parse(input)?)
    }

    /// Decrypts a blob into raw plaintext bytes, wiped on drop.
    ///
    /// The mode is taken from the blob, not from the vault configuration.
    ///
    /// # Errors
    /// * [`VaultError::Authentication`] If the padding or tag does not verify.
    pub fn decrypt_bytes(&self, blob: &CiphertextBlob) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        let plaintext = match blob.mode() {
            CipherMode::Cbc => open_cbc(&derive_key(&self.inner.secret), blob)?,
            CipherMode::Gcm => open_gcm(&derive_gcm_key(&self.inner.secret)?, blob)?,
        };
        Ok(Zeroizing::new(plaintext))
    }

    fn next_iv(&self, mode: CipherMode) -> Result<Vec<u8>, VaultError> {
        let mut iv = vec![0u8; mode.iv_len()];
        self.inner.entropy.fill(&mut iv).context("Drawing initialization vector")?;
        Ok(iv)
    }
}

/// One-shot encryption with a default vault for `secret`.
///
/// # Errors
/// * [`VaultError::Configuration`] If the secret is empty.
/// * Any error of [`Vault::encrypt`].
pub fn encrypt<T: Serialize + ?Sized>(plaintext: &T, secret: &str) -> Result<CiphertextBlob, VaultError> {
    Vault::builder().secret(secret)?.build().encrypt(plaintext)
}

/// One-shot decryption with `secret`.
///
/// # Errors
/// * [`VaultError::Configuration`] If the secret is empty.
/// * Any error of [`Vault::decrypt`].
pub fn decrypt(blob: &CiphertextBlob, secret: &str) -> Result<Value, VaultError> {
    Vault::builder().secret(secret)?.build().decrypt(blob)
}

fn key_error(mode: CipherMode) -> VaultError {
    VaultError::Internal {
        message: "cipher rejected key or iv length".into(),
        context: Some(mode.algorithm().into()),
    }
}

fn seal_cbc(key: &DerivedKey, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
    let cipher = CbcEncryptor::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| key_error(CipherMode::Cbc))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn open_cbc(key: &DerivedKey, blob: &CiphertextBlob) -> Result<Vec<u8>, VaultError> {
    let cipher = CbcDecryptor::new_from_slices(key.as_bytes(), blob.iv())
        .map_err(|_| key_error(CipherMode::Cbc))?;
    cipher.decrypt_padded_vec_mut::<Pkcs7>(blob.ciphertext()).map_err(|_| {
        VaultError::Authentication { message: "PKCS#7 padding check failed".into(), context: None }
    })
}

fn gcm_cipher(key: &DerivedKey) -> Result<Aes256Gcm, VaultError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| key_error(CipherMode::Gcm))
}

fn seal_gcm(key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
    gcm_cipher(key)?
        .encrypt(nonce.into(), Payload { msg: plaintext, aad: GCM_AAD })
        .map_err(|_| VaultError::Internal { message: "AEAD encryption failed".into(), context: None })
}

fn open_gcm(key: &DerivedKey, blob: &CiphertextBlob) -> Result<Vec<u8>, VaultError> {
    gcm_cipher(key)?
        .decrypt(blob.iv().into(), Payload { msg: blob.ciphertext(), aad: GCM_AAD })
        .map_err(|_| VaultError::Authentication {
            message: "AEAD tag check failed".into(),
            context: None,
        })
}
