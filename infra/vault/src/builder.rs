use crate::blob::CipherMode;
use crate::engine::{Vault, VaultInner};
use crate::entropy::{EntropySource, SystemEntropy};
use crate::error::VaultError;
use crate::secret::SharedSecret;
use private::Sealed;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct NoSecret;
#[derive(Debug)]
pub struct WithSecret(SharedSecret);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoSecret {}
impl Sealed for WithSecret {}

/// A builder for the [`Vault`].
///
/// The secret is supplied exactly once; a vault without a secret cannot be built.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct VaultBuilder<S: Sealed = NoSecret> {
    secret: S,
    mode: CipherMode,
    entropy: Option<Box<dyn EntropySource>>,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self { secret: NoSecret, mode: CipherMode::default(), entropy: None }
    }
}

impl VaultBuilder {
    #[must_use = "Builder must be given a secret before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shared secret from a string.
    ///
    /// # Errors
    /// Returns [`VaultError::Configuration`] if the secret is empty or only whitespace.
    pub fn secret(self, secret: impl Into<String>) -> Result<VaultBuilder<WithSecret>, VaultError> {
        Ok(self.shared_secret(SharedSecret::new(secret)?))
    }

    /// Sets an already validated shared secret.
    #[must_use]
    pub fn shared_secret(self, secret: SharedSecret) -> VaultBuilder<WithSecret> {
        VaultBuilder { secret: WithSecret(secret), mode: self.mode, entropy: self.entropy }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> VaultBuilder<S> {
    /// Selects the mode used for new blobs. Decryption always follows the blob's own mode.
    #[must_use]
    pub const fn mode(mut self, mode: CipherMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the OS CSPRNG, e.g. with a failing source in tests.
    #[must_use]
    pub fn entropy(mut self, entropy: impl EntropySource + 'static) -> Self {
        self.entropy = Some(Box::new(entropy));
        self
    }
}

impl VaultBuilder<WithSecret> {
    /// Finalizes vault construction.
    #[must_use]
    pub fn build(self) -> Vault {
        let inner = VaultInner {
            secret: self.secret.0,
            mode: self.mode,
            entropy: self.entropy.unwrap_or_else(|| Box::new(SystemEntropy)),
        };
        Vault { inner: Arc::new(inner) }
    }
}
