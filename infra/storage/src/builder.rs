use crate::engine::{FsContentStore, FsStoreInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tokio::fs;
use tracing::info;

const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct FsStoreSettings {
    create: bool,
    stale_after: Duration,
}

impl Default for FsStoreSettings {
    fn default() -> Self {
        Self { create: true, stale_after: DEFAULT_STALE_AFTER }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FsStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    settings: FsStoreSettings,
}

#[allow(private_bounds)]
impl<S: Sealed> FsStoreBuilder<S> {
    #[must_use = "Sets whether the root directory is created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.settings.create = enable;
        self
    }

    /// Age after which an orphaned temp file is considered abandoned.
    #[must_use = "Sets the temp file cleanup threshold"]
    pub const fn stale_after(mut self, threshold: Duration) -> Self {
        self.settings.stale_after = threshold;
        self
    }
}

impl FsStoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default settings"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the content store"]
    pub fn root(self, path: impl Into<PathBuf>) -> FsStoreBuilder<WithRoot> {
        FsStoreBuilder { state: WithRoot(path.into()), settings: self.settings }
    }
}

impl FsStoreBuilder<WithRoot> {
    /// Bootstraps the root, canonicalizes it and sweeps stale temp files.
    ///
    /// A failed sweep is logged and does not fail the connection.
    ///
    /// # Errors
    /// * [`StorageError::InvalidConfiguration`] if the root path is empty.
    /// * [`StorageError::Io`] if the root is missing (and `create` is false) or unreadable.
    pub async fn connect(self) -> Result<FsContentStore, StorageError> {
        let root = &self.state.0;
        if root.as_os_str().is_empty() {
            return Err(StorageError::InvalidConfiguration {
                message: "storage root must not be empty".into(),
                context: None,
            });
        }

        if self.settings.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap storage root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve storage root: {}", root.display()))?;
        info!(path = %canonical.display(), "Content store ready");

        let store = FsContentStore {
            inner: Arc::new(FsStoreInner {
                root: canonical,
                stale_after: self.settings.stale_after,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}
