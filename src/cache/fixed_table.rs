//! Fixed-size open-chaining hash table for `u32` keys.
//!
//! The bucket array is sized once, to the next power of two at or above the
//! requested capacity, and never grows. A key always lives in bucket
//! `key & mask`. Each bucket owns a singly linked chain; new keys go to the
//! head, existing keys are updated in place. There is no deletion and no
//! eviction, so inserting far more distinct keys than buckets degrades every
//! operation to a chain walk.
//!
//! The table does no internal locking. It may be read from several threads
//! once populated, but writes need `&mut self`.

use std::fmt;

use super::{AnyCache, CacheKind, INTMAP_SMALL_CAPACITY};

/// Largest capacity whose power-of-two rounding still fits in 32 bits.
pub const MAX_CAPACITY: usize = 1 << 31;

type Link = Option<Box<Node>>;

struct Node {
    key: u32,
    value: u32,
    next: Link,
}

/// Rounds `capacity` up to a power of two by smearing the highest set bit
/// into every lower position.
///
/// Panics unless `1 <= capacity <= 2^31`.
pub fn table_size_for(capacity: usize) -> usize {
    assert!(capacity > 0, "Capacity must be greater than 0");
    assert!(capacity <= MAX_CAPACITY, "Capacity must not exceed 2^31");

    let mut n = (capacity - 1) as u32;
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n as usize + 1
}

/// Chained `u32 -> u32` table with a bucket array fixed at construction.
pub struct FixedHashTable {
    buckets: Box<[Link]>,
    mask: u32,
    len: usize,
    kind: CacheKind,
}

impl FixedHashTable {
    /// Allocates `table_size_for(capacity)` empty buckets.
    ///
    /// Tables no larger than the `intmap-small` preset report themselves as
    /// [`CacheKind::IntMapSmall`], larger ones as [`CacheKind::IntMapLarge`].
    pub fn new(capacity: usize) -> Self {
        let kind = if table_size_for(capacity) <= table_size_for(INTMAP_SMALL_CAPACITY) {
            CacheKind::IntMapSmall
        } else {
            CacheKind::IntMapLarge
        };
        Self::with_kind(capacity, kind)
    }

    pub(crate) fn with_kind(capacity: usize, kind: CacheKind) -> Self {
        let size = table_size_for(capacity);
        let buckets = std::iter::repeat_with(|| None).take(size).collect();
        Self {
            buckets,
            mask: (size - 1) as u32,
            len: 0,
            kind,
        }
    }

    #[inline]
    fn index(&self, key: u32) -> usize {
        (key & self.mask) as usize
    }

    /// Returns the value for `key`, or `0` if the chain holds no such key.
    pub fn get(&self, key: u32) -> u32 {
        let mut cur = self.buckets[self.index(key)].as_deref();
        while let Some(node) = cur {
            if node.key == key {
                return node.value;
            }
            cur = node.next.as_deref();
        }
        0
    }

    /// Overwrites `key` in place if present, otherwise links a new node at the
    /// head of its chain.
    pub fn put(&mut self, key: u32, value: u32) {
        let idx = self.index(key);

        let mut cur = self.buckets[idx].as_deref_mut();
        while let Some(node) = cur {
            if node.key == key {
                node.value = value;
                return;
            }
            cur = node.next.as_deref_mut();
        }

        let next = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(Node { key, value, next }));
        self.len += 1;
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the bucket array. Always a power of two.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of nodes in the chain `key` maps to.
    pub fn chain_len(&self, key: u32) -> usize {
        self.chain(key).count()
    }

    /// Keys in the chain `key` maps to, head first.
    pub fn chain_keys(&self, key: u32) -> Vec<u32> {
        self.chain(key).map(|node| node.key).collect()
    }

    fn chain(&self, key: u32) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.buckets[self.index(key)].as_deref(), |node| {
            node.next.as_deref()
        })
    }
}

impl Drop for FixedHashTable {
    // Unlink chains one node at a time; the default recursive drop could
    // overflow the stack on a pathologically long chain.
    fn drop(&mut self) {
        for slot in self.buckets.iter_mut() {
            let mut cur = slot.take();
            while let Some(mut node) = cur {
                cur = node.next.take();
            }
        }
    }
}

impl fmt::Debug for FixedHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedHashTable")
            .field("kind", &self.kind)
            .field("buckets", &self.buckets.len())
            .field("len", &self.len)
            .finish()
    }
}

impl AnyCache for FixedHashTable {
    fn get(&self, key: u32) -> u32 {
        FixedHashTable::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        FixedHashTable::put(self, key, value);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn kind(&self) -> CacheKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::INTMAP_LARGE_CAPACITY;

    /// The two presets round to 2^18 and 2^20 buckets.
    #[test]
    fn test_preset_sizes_round_to_power_of_two() {
        assert_eq!(table_size_for(256_000), 262_144);
        assert_eq!(table_size_for(1_000_000), 1_048_576);

        let small = FixedHashTable::new(INTMAP_SMALL_CAPACITY);
        assert_eq!(small.bucket_count(), 1 << 18);
        assert_eq!(small.kind, CacheKind::IntMapSmall);

        let large = FixedHashTable::new(INTMAP_LARGE_CAPACITY);
        assert_eq!(large.bucket_count(), 1 << 20);
        assert_eq!(large.kind, CacheKind::IntMapLarge);
    }

    /// Exact powers of two are kept, everything else rounds up.
    #[test]
    fn test_size_rounding_edges() {
        assert_eq!(table_size_for(1), 1);
        assert_eq!(table_size_for(2), 2);
        assert_eq!(table_size_for(3), 4);
        assert_eq!(table_size_for(1024), 1024);
        assert_eq!(table_size_for(1025), 2048);
        assert_eq!(table_size_for(MAX_CAPACITY), MAX_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _ = FixedHashTable::new(0);
    }

    #[test]
    #[should_panic(expected = "Capacity must not exceed 2^31")]
    fn test_oversized_capacity_panics() {
        let _ = table_size_for(MAX_CAPACITY + 1);
    }

    /// A miss on an empty bucket and a miss at the end of a chain both return 0.
    #[test]
    fn test_miss_returns_default() {
        let mut table = FixedHashTable::new(4);
        assert_eq!(table.get(1), 0);
        table.put(1, 11);
        assert_eq!(table.get(5), 0, "same bucket, different key");
        assert_eq!(table.get(1), 11);
    }

    /// Colliding keys are pushed onto the head of the chain.
    #[test]
    fn test_new_key_inserted_at_head() {
        let mut table = FixedHashTable::new(4);
        table.put(1, 10);
        assert_eq!(table.chain_len(1), 1);

        table.put(5, 50);
        assert_eq!(table.chain_len(1), 2);
        assert_eq!(table.chain_keys(1), vec![5, 1]);

        table.put(9, 90);
        assert_eq!(table.chain_keys(9), vec![9, 5, 1]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.chain_len(2), 0, "neighbouring bucket untouched");
    }

    /// Updating a key leaves the chain's length and order alone.
    #[test]
    fn test_update_in_place() {
        let mut table = FixedHashTable::new(4);
        for k in [1, 5, 9] {
            table.put(k, k);
        }
        table.put(5, 500);
        assert_eq!(table.chain_keys(1), vec![9, 5, 1]);
        assert_eq!(table.get(5), 500);
        assert_eq!(table.get(9), 9);
        assert_eq!(table.get(1), 1);
        assert_eq!(table.len(), 3);
    }

    /// Every key in a domain four times the bucket count reads back after population.
    #[test]
    fn test_full_domain_with_collisions() {
        let mut table = FixedHashTable::new(1000);
        assert_eq!(table.bucket_count(), 1024);
        for k in 0..4096 {
            table.put(k, k);
        }
        for k in 0..4096 {
            assert_eq!(table.get(k), k);
        }
        assert_eq!(table.chain_len(0), 4);
        assert_eq!(table.len(), 4096);
    }

    /// A single bucket holding tens of thousands of nodes drops without
    /// recursing down the chain.
    #[test]
    fn test_drop_long_chain() {
        let mut table = FixedHashTable::new(1);
        assert_eq!(table.bucket_count(), 1);
        for k in 0..30_000 {
            table.put(k, k);
        }
        assert_eq!(table.chain_len(0), 30_000);
        assert_eq!(table.chain_keys(0)[0], 29_999);
        drop(table);
    }
}
