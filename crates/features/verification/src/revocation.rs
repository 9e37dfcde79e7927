use fxhash::FxHashSet;
use parking_lot::RwLock;
use std::fmt::Debug;

/// Registry of revoked credential ids.
///
/// Lookups are synchronous; implementations backed by remote state must cache.
pub trait RevocationRegistry: Debug + Send + Sync {
    fn is_revoked(&self, credential_id: &str) -> bool;

    /// Marks `credential_id` revoked. Returns `true` if it was not revoked before.
    fn revoke(&self, credential_id: &str) -> bool;

    fn revoked_count(&self) -> usize;

    /// Every revoked id, sorted.
    fn revoked(&self) -> Vec<String>;
}

/// Process-local registry.
#[derive(Debug, Default)]
pub struct MemoryRevocationRegistry {
    revoked: RwLock<FxHashSet<String>>,
}

impl MemoryRevocationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationRegistry for MemoryRevocationRegistry {
    fn is_revoked(&self, credential_id: &str) -> bool {
        self.revoked.read().contains(credential_id)
    }

    fn revoke(&self, credential_id: &str) -> bool {
        self.revoked.write().insert(credential_id.to_owned())
    }

    fn revoked_count(&self) -> usize {
        self.revoked.read().len()
    }

    fn revoked(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.revoked.read().iter().cloned().collect();
        ids.sort_unstable();
        ids
    }
}
