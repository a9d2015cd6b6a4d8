use parking_lot::RwLock;

use super::{AnyCache, CacheKind, FixedHashTable, SharedCache};

/// [`FixedHashTable`] behind a single reader-writer lock, so the chained
/// table can take concurrent writers.
#[derive(Debug)]
pub struct SharedFixedTable {
    table: RwLock<FixedHashTable>,
}

impl SharedFixedTable {
    /// Allocates `table_size_for(capacity)` buckets.
    ///
    /// Panics unless `1 <= capacity <= 2^31`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RwLock::new(FixedHashTable::with_kind(capacity, CacheKind::SharedInt)),
        }
    }

    pub fn get(&self, key: u32) -> u32 {
        self.table.read().get(key)
    }

    pub fn put(&self, key: u32, value: u32) {
        self.table.write().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.table.read().bucket_count()
    }
}

impl AnyCache for SharedFixedTable {
    fn get(&self, key: u32) -> u32 {
        SharedFixedTable::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        self.table.get_mut().put(key, value);
    }

    fn len(&self) -> usize {
        SharedFixedTable::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::SharedInt
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self)
    }
}

impl SharedCache for SharedFixedTable {
    fn get(&self, key: u32) -> u32 {
        SharedFixedTable::get(self, key)
    }

    fn put(&self, key: u32, value: u32) {
        SharedFixedTable::put(self, key, value);
    }

    fn len(&self) -> usize {
        SharedFixedTable::len(self)
    }
}
