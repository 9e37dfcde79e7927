use crate::address::ContentAddress;
use crate::engine::FsContentStore;
use crate::error::StorageError;
use crate::memory::MemoryContentStore;
use std::fmt;
use std::future::{Future, ready};

/// A content-addressed blob store: bytes in, address out.
///
/// Implementations must be idempotent on `publish` and must never return bytes
/// that do not hash to the requested address.
pub trait ContentStore: fmt::Debug + Send + Sync {
    /// Stores `bytes` and returns their address.
    fn publish(
        &self,
        bytes: &[u8],
    ) -> impl Future<Output = Result<ContentAddress, StorageError>> + Send;

    /// Returns the bytes stored under `address`.
    fn fetch(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn contains(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Every stored address, in no particular order.
    fn list(&self) -> impl Future<Output = Result<Vec<ContentAddress>, StorageError>> + Send;

    /// Reads a named mutable record kept beside the content, if it exists.
    fn read_record(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Replaces a named record as a whole.
    fn write_record(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl ContentStore for FsContentStore {
    fn publish(
        &self,
        bytes: &[u8],
    ) -> impl Future<Output = Result<ContentAddress, StorageError>> + Send {
        Self::publish(self, bytes)
    }

    fn fetch(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send {
        Self::fetch(self, address)
    }

    fn contains(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send {
        Self::contains(self, address)
    }

    fn list(&self) -> impl Future<Output = Result<Vec<ContentAddress>, StorageError>> + Send {
        Self::list(self)
    }

    fn read_record(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        Self::read_record(self, name)
    }

    fn write_record(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        Self::write_record(self, name, bytes)
    }
}

impl ContentStore for MemoryContentStore {
    fn publish(
        &self,
        bytes: &[u8],
    ) -> impl Future<Output = Result<ContentAddress, StorageError>> + Send {
        ready(Ok(Self::publish(self, bytes)))
    }

    fn fetch(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send {
        ready(Self::fetch(self, address))
    }

    fn contains(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send {
        ready(Ok(Self::contains(self, address)))
    }

    fn list(&self) -> impl Future<Output = Result<Vec<ContentAddress>, StorageError>> + Send {
        ready(Ok(Self::list(self)))
    }

    fn read_record(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        ready(Self::read_record(self, name))
    }

    fn write_record(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        ready(Self::write_record(self, name, bytes))
    }
}

/// The store selected by configuration.
#[derive(Debug, Clone)]
pub enum BlobStore {
    Fs(FsContentStore),
    Memory(MemoryContentStore),
}

impl BlobStore {
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Fs(_) => "fs",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<FsContentStore> for BlobStore {
    fn from(store: FsContentStore) -> Self {
        Self::Fs(store)
    }
}

impl From<MemoryContentStore> for BlobStore {
    fn from(store: MemoryContentStore) -> Self {
        Self::Memory(store)
    }
}

impl ContentStore for BlobStore {
    async fn publish(&self, bytes: &[u8]) -> Result<ContentAddress, StorageError> {
        match self {
            Self::Fs(store) => store.publish(bytes).await,
            Self::Memory(store) => Ok(store.publish(bytes)),
        }
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Fs(store) => store.fetch(address).await,
            Self::Memory(store) => store.fetch(address),
        }
    }

    async fn contains(&self, address: &ContentAddress) -> Result<bool, StorageError> {
        match self {
            Self::Fs(store) => store.contains(address).await,
            Self::Memory(store) => Ok(store.contains(address)),
        }
    }

    async fn list(&self) -> Result<Vec<ContentAddress>, StorageError> {
        match self {
            Self::Fs(store) => store.list().await,
            Self::Memory(store) => Ok(store.list()),
        }
    }

    async fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Self::Fs(store) => store.read_record(name).await,
            Self::Memory(store) => store.read_record(name),
        }
    }

    async fn write_record(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Fs(store) => store.write_record(name, bytes).await,
            Self::Memory(store) => store.write_record(name, bytes),
        }
    }
}
