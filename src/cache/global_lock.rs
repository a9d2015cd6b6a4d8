use std::collections::HashMap;

use parking_lot::RwLock;

use super::{AnyCache, CacheKind, SharedCache};

/// `HashMap` guarded by a single reader-writer lock.
///
/// Readers proceed in parallel; a writer excludes everyone. This is the
/// "safe but serialized" baseline.
#[derive(Debug, Default)]
pub struct GlobalLockMap {
    map: RwLock<HashMap<u32, u32>>,
}

impl GlobalLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Looks up `key` under the read lock. The guard is dropped on every path,
    /// including a miss.
    pub fn get(&self, key: u32) -> u32 {
        self.map.read().get(&key).copied().unwrap_or(0)
    }

    /// Inserts under the write lock, held for the whole mutation.
    pub fn put(&self, key: u32, value: u32) {
        self.map.write().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnyCache for GlobalLockMap {
    fn get(&self, key: u32) -> u32 {
        GlobalLockMap::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        GlobalLockMap::put(self, key, value);
    }

    fn len(&self) -> usize {
        GlobalLockMap::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Lock
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self)
    }
}

impl SharedCache for GlobalLockMap {
    fn get(&self, key: u32) -> u32 {
        GlobalLockMap::get(self, key)
    }

    fn put(&self, key: u32, value: u32) {
        GlobalLockMap::put(self, key, value);
    }

    fn len(&self) -> usize {
        GlobalLockMap::len(self)
    }
}
