use crate::address::ContentAddress;
use crate::error::StorageError;
use crate::security;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Volatile content store for tests and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    objects: Arc<RwLock<FxHashMap<ContentAddress, Arc<[u8]>>>>,
    records: Arc<RwLock<FxHashMap<String, Arc<[u8]>>>>,
}

impl MemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` under their address. Publishing the same bytes twice is a no-op.
    #[must_use = "The address is the only handle to the stored bytes"]
    pub fn publish(&self, bytes: &[u8]) -> ContentAddress {
        let address = ContentAddress::of(bytes);
        self.objects.write().entry(address.clone()).or_insert_with(|| Arc::from(bytes));
        address
    }

    /// # Errors
    /// Returns [`StorageError::NotFound`] if nothing is stored under `address`.
    pub fn fetch(&self, address: &ContentAddress) -> Result<Vec<u8>, StorageError> {
        self.objects.read().get(address).map(|bytes| bytes.to_vec()).ok_or_else(|| {
            StorageError::NotFound { message: address.to_string().into(), context: None }
        })
    }

    #[must_use]
    pub fn contains(&self, address: &ContentAddress) -> bool {
        self.objects.read().contains_key(address)
    }

    #[must_use]
    pub fn list(&self) -> Vec<ContentAddress> {
        self.objects.read().keys().cloned().collect()
    }

    /// # Errors
    /// Returns [`StorageError::InvalidAddress`] if `name` is not a flat record name.
    pub fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let name = security::validate_record_name(name)?;
        Ok(self.records.read().get(name).map(|bytes| bytes.to_vec()))
    }

    /// # Errors
    /// Returns [`StorageError::InvalidAddress`] if `name` is not a flat record name.
    pub fn write_record(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let name = security::validate_record_name(name)?;
        self.records.write().insert(name.to_owned(), Arc::from(bytes));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }
}
