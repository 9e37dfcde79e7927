use fxhash::FxHashMap;
use parking_lot::RwLock;
use skc_storage::ContentAddress;

/// In-memory `holder -> [address]` registry.
///
/// Holders are wallet-style hex addresses, so lookups ignore case and surrounding
/// whitespace. Each holder's list keeps insertion order and never holds duplicates.
#[derive(Debug, Default)]
pub struct CredentialIndex {
    entries: RwLock<FxHashMap<String, Vec<ContentAddress>>>,
}

impl CredentialIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `address` for `holder`. Returns `false` if the pair was already known.
    pub fn store(&self, holder: &str, address: ContentAddress) -> bool {
        let mut entries = self.entries.write();
        let list = entries.entry(normalize(holder)).or_default();
        if list.contains(&address) {
            return false;
        }
        list.push(address);
        true
    }

    /// Addresses issued to `holder`, oldest first.
    #[must_use]
    pub fn credentials_of(&self, holder: &str) -> Vec<ContentAddress> {
        self.entries.read().get(&normalize(holder)).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn holders(&self) -> usize {
        self.entries.read().len()
    }
}

fn normalize(holder: &str) -> String {
    holder.trim().to_ascii_lowercase()
}
