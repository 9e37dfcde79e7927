//! Facade crate for `SkillChain Passport` features and shared modules.
//! Re-exports domain/kernel/infra primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`bootstrap`] to build the vault and store from configuration and initialize
//!   every feature slice.
//! - Mount [`server::router::api_router`] on the resulting state.

use skc_credentials::CredentialError;
use skc_domain::config::{ApiConfig, CipherKind, StorageBackend};
use skc_domain::registry::InitializedSlice;
use skc_storage::{BlobStore, FsContentStore, MemoryContentStore, StorageError};
use skc_vault::{CipherMode, Vault, VaultError};
use skc_verification::VerificationError;
use std::borrow::Cow;
use tracing::{info, warn};

pub use skc_domain as domain;
pub use skc_kernel as kernel;
pub use skc_storage as storage;
pub use skc_vault as vault;

pub mod server {
    pub mod router {
        use skc_kernel::server::ApiState;
        use utoipa_axum::router::OpenApiRouter;

        pub use skc_credentials::router::credentials_router;
        pub use skc_kernel::server::router::system_router;
        pub use skc_verification::router::verification_router;

        /// Every route of the platform, documented.
        #[must_use]
        pub fn api_router() -> OpenApiRouter<ApiState> {
            system_router().merge(credentials_router()).merge(verification_router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use skc_credentials as credentials;
    pub use skc_verification as verification;

    pub const ENABLED: &[&str] = &["credentials", "verification"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// A specialized [`PlatformError`] enum of this crate.
#[skc_derive::skc_error]
pub enum PlatformError {
    #[error("Vault setup failed{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },
    #[error("Storage setup failed{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },
    #[error("Credential state could not be restored{}: {source}", format_context(.context))]
    Credentials { source: CredentialError, context: Option<Cow<'static, str>> },
    #[error("Revocations could not be restored{}: {source}", format_context(.context))]
    Verification { source: VerificationError, context: Option<Cow<'static, str>> },
}

/// Builds the credential vault from `security`.
///
/// # Errors
/// Returns [`VaultError::Configuration`] if `security.shared_secret` is unset or blank.
/// There is no fallback secret.
pub fn vault_from_config(config: &ApiConfig) -> Result<Vault, VaultError> {
    let secret = config.security.shared_secret.as_deref().ok_or_else(|| {
        VaultError::Configuration {
            message: "security.shared_secret is not set".into(),
            context: Some("set SKC__SECURITY__SHARED_SECRET or the config file".into()),
        }
    })?;

    let mode = match config.security.cipher {
        CipherKind::Aes256Cbc => CipherMode::Cbc,
        CipherKind::Aes256Gcm => CipherMode::Gcm,
    };

    Ok(Vault::builder().secret(secret)?.mode(mode).build())
}

/// Opens the content store selected by `storage.backend`.
///
/// # Errors
/// Returns a [`StorageError`] if the filesystem root cannot be prepared.
pub async fn store_from_config(config: &ApiConfig) -> Result<BlobStore, StorageError> {
    match config.storage.backend {
        StorageBackend::Fs => {
            let store = FsContentStore::builder().root(&config.storage.data_dir).connect().await?;
            Ok(store.into())
        }
        StorageBackend::Memory => {
            warn!("Memory content store selected: credentials will not survive a restart");
            Ok(MemoryContentStore::new().into())
        }
    }
}

/// Initialize all features on an already built vault and store.
///
/// The holder index and the revocation list are restored from `store`, so a
/// persistent store picks up where the last run left off.
///
/// # Errors
/// Returns an error if the stored credentials or revocations cannot be read.
pub async fn init(vault: Vault, store: BlobStore) -> Result<Vec<InitializedSlice>, PlatformError> {
    use skc_verification::{MemoryRevocationRegistry, MockProofScheme, RevocationJournal, Verifier};

    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new())
        .with_journal(RevocationJournal::new(store.clone()));
    verifier.restore().await.context("Restoring revocations")?;

    let credentials = features::credentials::init(vault, store);
    credentials.restore().await.context("Restoring credential index")?;

    Ok(vec![
        credentials.into_initialized(),
        features::verification::init(verifier).into_initialized(),
    ])
}

/// Builds vault and store from configuration and initializes all features.
///
/// # Errors
/// Returns an error if the vault or the store cannot be set up.
pub async fn bootstrap(config: &ApiConfig) -> Result<Vec<InitializedSlice>, PlatformError> {
    let vault = vault_from_config(config).context("Building vault")?;
    let store = store_from_config(config).await.context("Opening content store")?;

    info!(
        cipher = vault.mode().algorithm(),
        backend = store.backend(),
        features = ?features::ENABLED,
        "Platform bootstrapped"
    );

    init(vault, store).await
}
