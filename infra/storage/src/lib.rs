//! Content-addressed storage for published credentials.
//!
//! Every object is named by the lowercase hex SHA-256 of its bytes
//! ([`ContentAddress`]). Publishing is idempotent, and a fetch that returns bytes
//! not matching the address is reported as [`StorageError::Corrupted`] instead of
//! being handed to the decrypter.
//!
//! # Backends
//!
//! 1.  **[`FsContentStore`]**: sandboxed filesystem root with 2+2 shard
//!     directories, atomic writes (unique temp file + `fsync` + `rename`) and a
//!     stale temp file sweep on connect.
//! 2.  **[`MemoryContentStore`]**: an in-process map, for tests and demos.
//! 3.  **[`BlobStore`]**: the enum the server holds, selected by configuration.
//!
//! All three implement the [`ContentStore`] trait.
//!
//! # Examples
//!
//! ```rust
//! use skc_storage::{BlobStore, ContentStore, MemoryContentStore, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     let store = BlobStore::from(MemoryContentStore::new());
//!
//!     let address = store.publish(b"pinned credential").await?;
//!     assert_eq!(address, store.publish(b"pinned credential").await?);
//!     assert!(store.contains(&address).await?);
//!     Ok(())
//! }
//! ```

mod address;
mod builder;
mod engine;
mod error;
mod maintenance;
mod memory;
mod security;
mod store;

pub use address::ContentAddress;
pub use builder::{FsStoreBuilder, NoRoot, WithRoot};
pub use engine::{FsContentStore, FsStoreInner};
pub use error::{StorageError, StorageErrorExt};
pub use maintenance::PurgeReport;
pub use memory::MemoryContentStore;
pub use store::{BlobStore, ContentStore};
