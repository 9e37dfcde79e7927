use crate::error::{VerificationError, VerificationErrorExt};
use crate::revocation::RevocationRegistry;
use serde::{Deserialize, Serialize};
use skc_storage::{BlobStore, ContentStore};
use tokio::sync::Mutex;
use tracing::debug;

/// Name of the record holding the revocation list.
pub const REVOCATIONS_RECORD: &str = "revocations.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RevocationSnapshot {
    revoked: Vec<String>,
}

/// Durable copy of a [`RevocationRegistry`], kept as a record beside the credentials.
///
/// Each write replaces the whole list. Writers are serialized and snapshot the
/// registry under the lock, so the last write on disk is always the fullest one.
#[derive(Debug)]
pub struct RevocationJournal {
    store: BlobStore,
    writer: Mutex<()>,
}

impl RevocationJournal {
    #[must_use]
    pub fn new(store: BlobStore) -> Self {
        Self { store, writer: Mutex::new(()) }
    }

    /// Revoked ids from the last write, empty if nothing was ever revoked.
    ///
    /// # Errors
    /// * [`VerificationError::Storage`] If the record cannot be read.
    /// * [`VerificationError::Record`] If the record is not a revocation list.
    pub async fn load(&self) -> Result<Vec<String>, VerificationError> {
        let Some(bytes) =
            self.store.read_record(REVOCATIONS_RECORD).await.context("Reading revocations")?
        else {
            return Ok(Vec::new());
        };
        let snapshot: RevocationSnapshot =
            serde_json::from_slice(&bytes).context("Decoding revocations")?;
        Ok(snapshot.revoked)
    }

    /// Writes the current contents of `registry`.
    ///
    /// # Errors
    /// Returns [`VerificationError::Storage`] if the record cannot be written.
    pub async fn persist(&self, registry: &dyn RevocationRegistry) -> Result<(), VerificationError> {
        let _guard = self.writer.lock().await;
        let snapshot = RevocationSnapshot { revoked: registry.revoked() };
        let bytes = serde_json::to_vec(&snapshot).context("Encoding revocations")?;

        self.store.write_record(REVOCATIONS_RECORD, &bytes).await.context("Writing revocations")?;
        debug!(revoked = snapshot.revoked.len(), "Revocations persisted");
        Ok(())
    }
}
