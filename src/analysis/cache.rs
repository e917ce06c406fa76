use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{CacheKey, ProgressData};

/// Process-wide store of loaded progress results.
///
/// Construct one per application and share it with every loader through an
/// `Arc`. Entries never expire: the first successful result for a key wins and
/// later stores for the same key are ignored.
pub struct ProgressCache {
    entries: Mutex<HashMap<CacheKey, Arc<ProgressData>>>,
}

impl ProgressCache {
    /// Create a new, empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<ProgressData>>> {
        // Holders never panic mid-update, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a result unless the key already has one; returns the cached value.
    pub fn store(&self, key: CacheKey, result: Arc<ProgressData>) -> Arc<ProgressData> {
        Arc::clone(self.entries().entry(key).or_insert(result))
    }

    /// Retrieve a result from the cache
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ProgressData>> {
        self.entries().get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl Default for ProgressCache {
    fn default() -> Self {
        Self::new()
    }
}
