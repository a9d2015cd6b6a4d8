use dashmap::DashMap;

use super::{AnyCache, CacheKind, SharedCache};

/// Thin adapter over [`DashMap`], the off-the-shelf sharded map.
#[derive(Debug, Default)]
pub struct DashMapCache {
    map: DashMap<u32, u32>,
}

impl DashMapCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: DashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: u32) -> u32 {
        self.map.get(&key).map(|v| *v).unwrap_or(0)
    }

    pub fn put(&self, key: u32, value: u32) {
        self.map.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl AnyCache for DashMapCache {
    fn get(&self, key: u32) -> u32 {
        DashMapCache::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        DashMapCache::put(self, key, value);
    }

    fn len(&self) -> usize {
        DashMapCache::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Dash
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self)
    }
}

impl SharedCache for DashMapCache {
    fn get(&self, key: u32) -> u32 {
        DashMapCache::get(self, key)
    }

    fn put(&self, key: u32, value: u32) {
        DashMapCache::put(self, key, value);
    }

    fn len(&self) -> usize {
        DashMapCache::len(self)
    }
}
