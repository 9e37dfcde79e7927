use crate::error::VaultError;
use std::fmt;

/// Source of initialization vectors.
///
/// Implementations must be thread-safe; a single vault serves concurrent requests.
/// A failure is fatal for the current encryption and is never retried.
pub trait EntropySource: fmt::Debug + Send + Sync {
    /// Fills `dest` with cryptographically secure random bytes.
    ///
    /// # Errors
    /// Returns [`VaultError::RandomnessUnavailable`] if no randomness can be drawn.
    fn fill(&self, dest: &mut [u8]) -> Result<(), VaultError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), VaultError> {
        getrandom::fill(dest).map_err(|e| VaultError::RandomnessUnavailable {
            message: e.to_string().into(),
            context: Some("OS CSPRNG".into()),
        })
    }
}
