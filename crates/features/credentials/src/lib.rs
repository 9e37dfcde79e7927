//! Credential issuance feature slice.
//!
//! Issuing a credential wraps it in an envelope, encrypts the envelope with the
//! [`Vault`], pins the ciphertext together with public metadata in the content store
//! and records the holder in the [`CredentialIndex`].
//!
//! ```rust
//! use skc_credentials::IssueRequest;
//! use skc_storage::MemoryContentStore;
//! use skc_vault::Vault;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = Vault::builder().secret("test-secret-value")?.build();
//! let credentials = skc_credentials::init(vault, MemoryContentStore::new().into());
//!
//! let request: IssueRequest = serde_json::from_value(serde_json::json!({
//!     "studentAddress": "0xABC",
//!     "issuerAddress": "0xDEF",
//!     "credential": { "type": "degree", "title": "B.Tech" }
//! }))?;
//! let receipt = credentials.issue(request).await?;
//!
//! let envelope = credentials.open(&receipt.address).await?;
//! assert_eq!(envelope.credential.title, "B.Tech");
//! assert_eq!(credentials.list("0xabc"), vec![receipt.address]);
//! # Ok(())
//! # }
//! ```

mod error;
mod handlers;
mod index;
mod model;
pub mod router;

pub use error::{CredentialError, CredentialErrorExt};
pub use index::CredentialIndex;
pub use model::{
    CredentialDetails, CredentialEnvelope, CredentialResponse, HolderCredentials, IssueReceipt,
    IssueRequest, PinMeta, PinnedCredential,
};

use chrono::{SubsecRound, Utc};
use skc_kernel::domain::constants::APP_NAME;
use skc_storage::{BlobStore, ContentAddress, ContentStore};
use skc_vault::Vault;
use tracing::{debug, info, warn};

/// Credentials feature state
#[skc_derive::skc_slice]
pub struct Credentials {
    pub vault: Vault,
    pub store: BlobStore,
    pub index: CredentialIndex,
}

/// Initialize the credentials feature.
#[must_use]
pub fn init(vault: Vault, store: BlobStore) -> Credentials {
    info!(cipher = vault.mode().algorithm(), backend = store.backend(), "Credentials slice initialized");

    Credentials::new(CredentialsInner { vault, store, index: CredentialIndex::new() })
}

impl Credentials {
    /// Encrypts and pins a credential for its holder.
    ///
    /// # Errors
    /// * [`CredentialError::Validation`] If the holder or issuer address is blank.
    /// * [`CredentialError::Vault`] If encryption fails.
    /// * [`CredentialError::Storage`] If the document cannot be published.
    pub async fn issue(&self, request: IssueRequest) -> Result<IssueReceipt, CredentialError> {
        let holder = request.student_address.trim();
        let issuer = request.issuer_address.trim();
        if holder.is_empty() {
            return Err(CredentialError::validation("studentAddress is required"));
        }
        if issuer.is_empty() {
            return Err(CredentialError::validation("issuerAddress is required"));
        }

        let now = Utc::now().trunc_subsecs(3);
        let envelope = CredentialEnvelope {
            holder: holder.to_owned(),
            issuer: issuer.to_owned(),
            credential: request.credential,
            created_at: now,
        };

        let encrypted = self.vault.encrypt(&envelope).context("Encrypting credential envelope")?;
        let pinned = PinnedCredential {
            encrypted,
            meta: PinMeta {
                app: APP_NAME.to_owned(),
                timestamp: now,
                holder: envelope.holder.clone(),
                issuer: envelope.issuer.clone(),
            },
        };

        let document = serde_json::to_vec(&pinned).context("Encoding pinned credential")?;
        let address = self.store.publish(&document).await.context("Publishing credential")?;
        self.index.store(&envelope.holder, address.clone());

        info!(
            address = %address,
            holder = %envelope.holder,
            issuer = %envelope.issuer,
            alg = pinned.encrypted.mode().algorithm(),
            "Credential issued"
        );

        Ok(IssueReceipt { success: true, address })
    }

    /// Loads the pinned document without decrypting it.
    ///
    /// # Errors
    /// * [`CredentialError::Storage`] If the address is unknown or the bytes are corrupted.
    /// * [`CredentialError::Document`] If the stored bytes are not a pinned credential.
    pub async fn fetch(&self, address: &ContentAddress) -> Result<PinnedCredential, CredentialError> {
        let bytes = self.store.fetch(address).await?;
        let pinned: PinnedCredential = serde_json::from_slice(&bytes).context("Decoding pinned credential")?;
        debug!(address = %address, "Credential fetched");
        Ok(pinned)
    }

    /// Fetches and decrypts a credential.
    ///
    /// # Errors
    /// * Any error of [`Credentials::fetch`].
    /// * [`CredentialError::Vault`] If the ciphertext cannot be decrypted.
    pub async fn open(&self, address: &ContentAddress) -> Result<CredentialEnvelope, CredentialError> {
        let pinned = self.fetch(address).await?;
        let envelope = self.vault.decrypt_as(&pinned.encrypted)?;
        Ok(envelope)
    }

    /// Rebuilds the holder index from the documents already in the store.
    ///
    /// Documents are indexed in issuance order. Objects that are not pinned credentials
    /// are skipped. Returns the number of credentials indexed.
    ///
    /// # Errors
    /// Returns [`CredentialError::Storage`] if the store cannot be listed or read.
    pub async fn restore(&self) -> Result<usize, CredentialError> {
        let addresses = self.store.list().await.context("Listing stored credentials")?;

        let mut found = Vec::with_capacity(addresses.len());
        for address in addresses {
            let bytes = self.store.fetch(&address).await?;
            match serde_json::from_slice::<PinnedCredential>(&bytes) {
                Ok(pinned) => found.push((pinned.meta.timestamp, pinned.meta.holder, address)),
                Err(e) => warn!(address = %address, error = %e, "Skipping object that is not a credential"),
            }
        }
        found.sort();

        let indexed = found.len();
        for (_, holder, address) in found {
            self.index.store(&holder, address);
        }

        info!(indexed, holders = self.index.holders(), "Credential index restored");
        Ok(indexed)
    }

    /// Addresses issued to `holder`, oldest first.
    #[must_use]
    pub fn list(&self, holder: &str) -> Vec<ContentAddress> {
        self.index.credentials_of(holder)
    }
}
