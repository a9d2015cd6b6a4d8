//! Striped map: the key space is partitioned across independent shards.
//!
//! Instead of protecting the whole map behind one lock, each shard is its own
//! `RwLock<HashMap>`. Keys that land in different shards never contend, and
//! operations on the same key are serialized by that key's shard.
//!
//! No ordering is promised across keys in different shards.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{AnyCache, CacheKind, SharedCache};

/// Shard count used by [`ConcurrentShardedMap::with_capacity`].
pub const DEFAULT_SHARDS: usize = 16;

fn distribute_capacity(total: usize, shards: usize) -> Vec<usize> {
    let base = total / shards;
    let rem = total % shards;
    (0..shards).map(|i| base + usize::from(i < rem)).collect()
}

/// Thread-safe map with per-shard locking.
#[derive(Debug)]
pub struct ConcurrentShardedMap {
    shards: Box<[RwLock<HashMap<u32, u32>>]>,
}

impl ConcurrentShardedMap {
    /// Creates a map with [`DEFAULT_SHARDS`] shards holding `capacity` keys in total.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_shards(capacity, DEFAULT_SHARDS)
    }

    /// Creates a map with `shard_count` shards. A count of zero is treated as one.
    pub fn with_shards(capacity: usize, shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = distribute_capacity(capacity, shard_count)
            .into_iter()
            .map(|c| RwLock::new(HashMap::with_capacity(c)))
            .collect();
        Self { shards }
    }

    /// Keys are their own hash, so consecutive keys spread round-robin.
    #[inline]
    fn shard(&self, key: u32) -> &RwLock<HashMap<u32, u32>> {
        &self.shards[key as usize % self.shards.len()]
    }

    pub fn get(&self, key: u32) -> u32 {
        self.shard(key).read().get(&key).copied().unwrap_or(0)
    }

    pub fn put(&self, key: u32, value: u32) {
        self.shard(key).write().insert(key, value);
    }

    /// Total number of keys across all shards. Not a snapshot under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Keys held by each shard, in shard order.
    pub fn shard_lens(&self) -> Vec<usize> {
        self.shards.iter().map(|s| s.read().len()).collect()
    }
}

impl AnyCache for ConcurrentShardedMap {
    fn get(&self, key: u32) -> u32 {
        ConcurrentShardedMap::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        ConcurrentShardedMap::put(self, key, value);
    }

    fn len(&self) -> usize {
        ConcurrentShardedMap::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Concurrent
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self)
    }
}

impl SharedCache for ConcurrentShardedMap {
    fn get(&self, key: u32) -> u32 {
        ConcurrentShardedMap::get(self, key)
    }

    fn put(&self, key: u32, value: u32) {
        ConcurrentShardedMap::put(self, key, value);
    }

    fn len(&self) -> usize {
        ConcurrentShardedMap::len(self)
    }
}
