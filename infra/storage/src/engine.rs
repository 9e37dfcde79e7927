//! Filesystem backend: sandboxed, sharded, atomic.
//!
//! Content lives at `<root>/<ab>/<cd>/<address>`, where `ab` and `cd` are the first
//! two byte pairs of the address. Writes go through a unique temp file, `fsync` and
//! `rename`, so a crash never leaves a partially written object under its address.

use crate::address::ContentAddress;
use crate::builder::FsStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::{self, PurgeReport, TMP_MARKER};
use crate::security;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory under the root that holds named records.
const RECORDS_DIR: &str = "records";

/// The internal shared state of a [`FsContentStore`].
#[derive(Debug)]
pub struct FsStoreInner {
    /// The canonicalized physical root; every object path is checked against it.
    pub(crate) root: PathBuf,
    pub(crate) stale_after: Duration,
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to the filesystem content store.
///
/// # Example
///
/// ```rust
/// use skc_storage::{FsContentStore, StorageError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("content");
///     let store = FsContentStore::builder().root(&root).connect().await?;
///
///     let address = store.publish(br#"{"encrypted":"..."}"#).await?;
///     assert_eq!(store.fetch(&address).await?, br#"{"encrypted":"..."}"#);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FsContentStore {
    pub(crate) inner: Arc<FsStoreInner>,
}

impl Deref for FsContentStore {
    type Target = FsStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FsContentStore {
    #[must_use = "The store is not initialized until you call .connect()"]
    pub fn builder() -> FsStoreBuilder {
        FsStoreBuilder::new()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of an object, validated against the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if a shard directory escapes the root.
    pub fn resolve(&self, address: &ContentAddress) -> Result<PathBuf, StorageError> {
        let (first, second) = address.shards();
        security::resolve_path(&self.root, Path::new(first).join(second).join(address.as_str()))
    }

    /// Stores `bytes` under their address. Publishing the same bytes twice is a no-op.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the disk is full or not writable.
    pub async fn publish(&self, bytes: &[u8]) -> Result<ContentAddress, StorageError> {
        let address = ContentAddress::of(bytes);
        let resolved = self.resolve(&address)?;

        if fs::try_exists(&resolved).await.context("Checking existing object")? {
            debug!(%address, "Content already stored");
            return Ok(address);
        }

        if let Err(err) = self.write_atomic(&resolved, bytes).await {
            // A concurrent publisher of the same bytes won the race.
            if fs::try_exists(&resolved).await.unwrap_or(false) {
                return Ok(address);
            }
            return Err(err).context(format!("Atomic swap failed for {address}"));
        }

        debug!(%address, size = bytes.len(), "Content stored atomically");
        Ok(address)
    }

    /// Reads an object and verifies it still hashes to its address.
    ///
    /// # Errors
    /// * [`StorageError::NotFound`] if nothing is stored under `address`.
    /// * [`StorageError::Corrupted`] if the bytes on disk were altered.
    pub async fn fetch(&self, address: &ContentAddress) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(address)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    message: address.to_string().into(),
                    context: None,
                });
            },
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {address}").into()),
                });
            },
        };

        if !address.matches(&data) {
            warn!(%address, "Stored content does not match its address");
            return Err(StorageError::Corrupted { message: address.to_string().into(), context: None });
        }
        Ok(data)
    }

    /// # Errors
    /// Returns [`StorageError::Io`] if the object path cannot be inspected.
    pub async fn contains(&self, address: &ContentAddress) -> Result<bool, StorageError> {
        let resolved = self.resolve(address)?;
        fs::try_exists(&resolved).await.context(format!("Checking {address}"))
    }

    /// Every stored address, in no particular order.
    ///
    /// Only files sitting in their own shard directories count, so records and temp
    /// files are never reported as content.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the listing task fails.
    pub async fn list(&self) -> Result<Vec<ContentAddress>, StorageError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || list_objects(&root))
            .await
            .map_err(|e| StorageError::Io {
                source: std::io::Error::other(e),
                context: Some("Listing task failed".into()),
            })
    }

    /// Reads the named record, or `None` if it was never written.
    ///
    /// Records are small mutable documents kept beside the content, e.g. the
    /// revocation list. They are not content-addressed.
    ///
    /// # Errors
    /// * [`StorageError::InvalidAddress`] if `name` is not a flat record name.
    /// * [`StorageError::Io`] if the record exists but cannot be read.
    pub async fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let resolved = self.resolve_record(name)?;
        match fs::read(&resolved).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: record {name}").into()),
            }),
        }
    }

    /// Replaces the named record atomically.
    ///
    /// # Errors
    /// * [`StorageError::InvalidAddress`] if `name` is not a flat record name.
    /// * [`StorageError::Io`] if the record cannot be written.
    pub async fn write_record(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let resolved = self.resolve_record(name)?;
        self.write_atomic(&resolved, bytes)
            .await
            .context(format!("Writing record {name}"))?;
        debug!(record = name, size = bytes.len(), "Record written atomically");
        Ok(())
    }

    /// Removes temp files older than the configured threshold and prunes empty shards.
    pub async fn purge_tmp(&self) -> PurgeReport {
        maintenance::purge_tmp(&self.root, self.stale_after).await
    }
}

impl FsContentStore {
    fn resolve_record(&self, name: &str) -> Result<PathBuf, StorageError> {
        let name = security::validate_record_name(name)?;
        security::resolve_path(&self.root, Path::new(RECORDS_DIR).join(name))
    }

    /// Unique temp file, `fsync`, `rename` over `target`, then `fsync` the directory.
    async fn write_atomic(&self, target: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let temp = unique_tmp_path(target, &self.tmp_counter);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(bytes).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io { source: err, context: None });
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent).await;
        }
        Ok(())
    }
}

/// Objects live exactly at `<root>/<ab>/<cd>/<address>`.
fn list_objects(root: &Path) -> Vec<ContentAddress> {
    WalkDir::new(root)
        .min_depth(3)
        .max_depth(3)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let address: ContentAddress = entry.file_name().to_str()?.parse().ok()?;
            let (first, second) = address.shards();
            let parent = entry.path().parent()?;
            let in_place = parent.file_name()? == second
                && parent.parent()?.file_name()? == first;
            in_place.then_some(address)
        })
        .collect()
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("object");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", std::process::id()))
}
