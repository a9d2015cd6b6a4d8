//! Map confined to a single owner thread.
//!
//! No lock guards the map. Every access is a message to the owner thread,
//! which applies requests one at a time in arrival order. Writes are
//! fire-and-forget once the owner has taken them; reads wait on a one-shot
//! reply channel.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use super::{AnyCache, CacheKind, SharedCache};

const OWNER_GONE: &str = "cache owner thread exited";

enum Request {
    Get { key: u32, reply: SyncSender<u32> },
    Put { key: u32, value: u32 },
    Len { reply: SyncSender<usize> },
    Shutdown,
}

/// `HashMap` owned by a dedicated thread and reached only through a request
/// channel.
pub struct ChannelCache {
    requests: SyncSender<Request>,
    owner: Option<JoinHandle<()>>,
}

impl ChannelCache {
    /// Spawns the owner thread with a map pre-sized to `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        // Rendezvous: a send completes only once the owner has taken it.
        let (requests, inbox) = mpsc::sync_channel(0);
        let map = HashMap::with_capacity(capacity);
        let owner = thread::spawn(move || serve(inbox, map));
        Self {
            requests,
            owner: Some(owner),
        }
    }

    pub fn get(&self, key: u32) -> u32 {
        let (reply, response) = mpsc::sync_channel(1);
        self.send(Request::Get { key, reply });
        response.recv().expect(OWNER_GONE)
    }

    pub fn put(&self, key: u32, value: u32) {
        self.send(Request::Put { key, value });
    }

    /// Number of keys once every request sent before this one is applied.
    pub fn len(&self) -> usize {
        let (reply, response) = mpsc::sync_channel(1);
        self.send(Request::Len { reply });
        response.recv().expect(OWNER_GONE)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn send(&self, request: Request) {
        self.requests.send(request).expect(OWNER_GONE);
    }
}

fn serve(inbox: Receiver<Request>, mut map: HashMap<u32, u32>) {
    for request in inbox {
        match request {
            Request::Get { key, reply } => {
                let _ = reply.send(map.get(&key).copied().unwrap_or(0));
            }
            Request::Put { key, value } => {
                map.insert(key, value);
            }
            Request::Len { reply } => {
                let _ = reply.send(map.len());
            }
            Request::Shutdown => break,
        }
    }
}

impl Drop for ChannelCache {
    fn drop(&mut self) {
        if self.requests.send(Request::Shutdown).is_err() {
            return;
        }
        if let Some(owner) = self.owner.take() {
            let _ = owner.join();
        }
    }
}

impl fmt::Debug for ChannelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCache").finish_non_exhaustive()
    }
}

impl AnyCache for ChannelCache {
    fn get(&self, key: u32) -> u32 {
        ChannelCache::get(self, key)
    }

    fn put(&mut self, key: u32, value: u32) {
        ChannelCache::put(self, key, value);
    }

    fn len(&self) -> usize {
        ChannelCache::len(self)
    }

    fn kind(&self) -> CacheKind {
        CacheKind::Channel
    }

    fn as_shared(&self) -> Option<&dyn SharedCache> {
        Some(self)
    }
}

impl SharedCache for ChannelCache {
    fn get(&self, key: u32) -> u32 {
        ChannelCache::get(self, key)
    }

    fn put(&self, key: u32, value: u32) {
        ChannelCache::put(self, key, value);
    }

    fn len(&self) -> usize {
        ChannelCache::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    /// A read issued after a write from the same thread observes it.
    #[test]
    fn test_read_after_write() {
        let cache = ChannelCache::with_capacity(16);
        assert_eq!(cache.get(4), 0);
        cache.put(4, 40);
        assert_eq!(cache.get(4), 40);
        cache.put(4, 41);
        assert_eq!(cache.get(4), 41);
        assert_eq!(cache.len(), 1);
    }

    /// Writers on disjoint key ranges all land once every sender has returned.
    #[test]
    fn test_concurrent_writers() {
        let cache = Arc::new(ChannelCache::with_capacity(4096));
        let threads = 4u32;
        let barrier = Arc::new(Barrier::new(threads as usize));
        let mut handles = Vec::new();

        for t in 0..threads {
            let c = Arc::clone(&cache);
            let b = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                b.wait();
                for i in 0..1024u32 {
                    let k = t * 1024 + i;
                    c.put(k, k);
                    assert_eq!(c.get(k), k);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.len(), 4096);
        for k in 0..4096 {
            assert_eq!(cache.get(k), k);
        }
    }

    /// Dropping the cache stops the owner thread.
    #[test]
    fn test_drop_joins_owner() {
        let cache = ChannelCache::with_capacity(4);
        cache.put(1, 1);
        drop(cache);
    }
}
