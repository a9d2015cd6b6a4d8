use std::collections::HashMap;

use super::{AnyCache, CacheKind};

/// Plain `HashMap` with no synchronization.
///
/// This is the performance baseline. Writes need `&mut self`, so it can only
/// be shared between threads for reads, and only once every key it will ever
/// hold has been inserted.
#[derive(Debug, Default)]
pub struct UnsharedMap {
    map: HashMap<u32, u32>,
}

impl UnsharedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the map so `capacity` keys fit without rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: u32) -> u32 {
        self.map.get(&key).copied().unwrap_or(0)
    }

    pub fn put(&mut self, key: u32, value: u32) {
        self.map.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl AnyCache for UnsharedMap {
    fn get(&self, key: u32) -> u32 {
        UnsharedMap::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        UnsharedMap::put(self, key, value);
    }

    fn len(&self) -> usize {
        UnsharedMap::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Unshared
    }
}
