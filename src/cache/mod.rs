//! Cache variants behind a common capability set.
//!
//! Every variant maps `u32 -> u32`, returns `0` for keys that were never
//! written, and never evicts. They differ in how they trade safety for speed:
//!
//! | variant                  | concurrent reads | concurrent writes |
//! |--------------------------|------------------|-------------------|
//! | [`UnsharedMap`]          | after population | no                |
//! | [`GlobalLockMap`]        | yes              | yes (serialized)  |
//! | [`ConcurrentShardedMap`] | yes              | yes (per shard)   |
//! | [`DashMapCache`]         | yes              | yes (per shard)   |
//! | [`ChannelCache`]         | yes              | yes (one owner)   |
//! | [`FixedHashTable`]       | after population | no                |
//! | [`SharedFixedTable`]     | yes              | yes (serialized)  |
//!
//! Variants that tolerate concurrent writes expose a [`SharedCache`] view
//! through [`AnyCache::as_shared`]. The others can only be mutated through
//! `&mut`, so the compiler rules out racing writers.

mod channel;
mod dash;
mod fixed_table;
mod global_lock;
mod shared_table;
mod sharded;
mod unshared;

use std::fmt;
use std::str::FromStr;

pub use channel::ChannelCache;
pub use dash::DashMapCache;
pub use fixed_table::{FixedHashTable, MAX_CAPACITY, table_size_for};
pub use global_lock::GlobalLockMap;
pub use shared_table::SharedFixedTable;
pub use sharded::ConcurrentShardedMap;
pub use unshared::UnsharedMap;

use crate::error::ConfigError;

/// Requested bucket count for the collision-heavy intmap (about 4 keys per
/// bucket over a 2^20 domain).
pub const INTMAP_SMALL_CAPACITY: usize = 256_000;

/// Requested bucket count for the near-collision-free intmap.
pub const INTMAP_LARGE_CAPACITY: usize = 1_000_000;

/// Capability set shared by every cache variant.
pub trait AnyCache: Send + Sync {
    /// Returns the value stored under `key`, or `0` if absent.
    fn get(&self, key: u32) -> u32;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, key: u32, value: u32);

    /// Number of distinct keys stored.
    fn len(&self) -> usize;

    /// Which variant this is.
    fn kind(&self) -> CacheKind;

    /// Returns a view that may be written through a shared reference, if the
    /// variant synchronizes internally.
    fn as_shared(&self) -> Option<&dyn SharedCache> {
        None
    }
}

/// Cache that may be read and written concurrently through `&self`.
pub trait SharedCache: Send + Sync {
    /// Returns the value stored under `key`, or `0` if absent.
    fn get(&self, key: u32) -> u32;

    /// Stores `value` under `key`.
    fn put(&self, key: u32, value: u32);

    /// Number of distinct keys stored. Not a snapshot under concurrent writes.
    fn len(&self) -> usize;
}

/// Adapts a shared view back into an [`AnyCache`], so one workload
/// implementation drives both exclusive and shared access.
#[derive(Clone, Copy)]
pub struct SharedHandle<'a> {
    inner: &'a dyn SharedCache,
    kind: CacheKind,
}

impl<'a> SharedHandle<'a> {
    /// Wraps `inner`, tagging it with the variant it came from.
    pub fn new(inner: &'a dyn SharedCache, kind: CacheKind) -> Self {
        Self { inner, kind }
    }
}

impl AnyCache for SharedHandle<'_> {
    fn get(&self, key: u32) -> u32 {
        self.inner.get(key)
    }

    fn put(&mut self, key: u32, value: u32) {
        self.inner.put(key, value);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn kind(&self) -> CacheKind {
        self.kind
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self.inner)
    }
}

/// Enumerated variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// [`UnsharedMap`].
    Unshared,
    /// [`GlobalLockMap`].
    Lock,
    /// [`ConcurrentShardedMap`].
    Concurrent,
    /// [`DashMapCache`].
    Dash,
    /// [`ChannelCache`].
    Channel,
    /// [`FixedHashTable`] sized for heavy chaining.
    IntMapSmall,
    /// [`FixedHashTable`] sized for short chains.
    IntMapLarge,
    /// [`SharedFixedTable`] sized for short chains.
    SharedInt,
}

impl CacheKind {
    /// All variants, in reporting order.
    pub const ALL: [CacheKind; 8] = [
        CacheKind::Unshared,
        CacheKind::Lock,
        CacheKind::Concurrent,
        CacheKind::Dash,
        CacheKind::Channel,
        CacheKind::IntMapSmall,
        CacheKind::IntMapLarge,
        CacheKind::SharedInt,
    ];

    /// Configuration name of this variant.
    pub fn name(&self) -> &'static str {
        match self {
            CacheKind::Unshared => "unshared",
            CacheKind::Lock => "lock",
            CacheKind::Concurrent => "concurrent",
            CacheKind::Dash => "dash",
            CacheKind::Channel => "channel",
            CacheKind::IntMapSmall => "intmap-small",
            CacheKind::IntMapLarge => "intmap-large",
            CacheKind::SharedInt => "sharedint",
        }
    }

    /// Default sizing for a key domain of `domain_mask + 1` keys.
    ///
    /// Map variants are pre-sized to hold the whole domain; the intmaps use
    /// their fixed bucket counts regardless of the domain.
    pub fn default_capacity(&self, domain_mask: u32) -> usize {
        match self {
            CacheKind::IntMapSmall => INTMAP_SMALL_CAPACITY,
            CacheKind::IntMapLarge | CacheKind::SharedInt => INTMAP_LARGE_CAPACITY,
            _ => domain_mask as usize + 1,
        }
    }

    /// Whether the variant can be written from several threads at once.
    pub fn is_thread_safe(&self) -> bool {
        matches!(
            self,
            CacheKind::Lock
                | CacheKind::Concurrent
                | CacheKind::Dash
                | CacheKind::Channel
                | CacheKind::SharedInt
        )
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownVariant(s.to_string()))
    }
}

/// Builds the variant selected by `kind`, pre-sized to `capacity`.
///
/// Panics if `capacity` is zero or above [`MAX_CAPACITY`];
/// [`HarnessConfig`](crate::HarnessConfig) validates both beforehand.
pub fn new_cache(kind: CacheKind, capacity: usize) -> Box<dyn AnyCache> {
    assert!(capacity > 0, "Capacity must be greater than 0");
    assert!(capacity <= MAX_CAPACITY, "Capacity must not exceed 2^31");
    match kind {
        CacheKind::Unshared => Box::new(UnsharedMap::with_capacity(capacity)),
        CacheKind::Lock => Box::new(GlobalLockMap::with_capacity(capacity)),
        CacheKind::Concurrent => Box::new(ConcurrentShardedMap::with_capacity(capacity)),
        CacheKind::Dash => Box::new(DashMapCache::with_capacity(capacity)),
        CacheKind::Channel => Box::new(ChannelCache::with_capacity(capacity)),
        CacheKind::IntMapSmall | CacheKind::IntMapLarge => {
            Box::new(FixedHashTable::with_kind(capacity, kind))
        }
        CacheKind::SharedInt => Box::new(SharedFixedTable::with_capacity(capacity)),
    }
}
