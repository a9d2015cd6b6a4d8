use cache_shootout::cache::{
    ChannelCache, ConcurrentShardedMap, DashMapCache, FixedHashTable, GlobalLockMap,
    SharedFixedTable, UnsharedMap,
};
use cache_shootout::harness::{populate, verify_domain};
use cache_shootout::{AnyCache, CacheKind, SharedCache, new_cache};
use std::sync::{Arc, Barrier};
use std::thread;

const MASK: u32 = (1 << 16) - 1;

#[test]
fn every_variant_round_trips_and_defaults_to_zero() {
    for kind in CacheKind::ALL {
        let mut cache = new_cache(kind, 1024);
        for k in [0, 1, 1023, 1024, 65_535, 0x7fff_ffff] {
            assert_eq!(cache.get(k), 0, "{kind}: key {k} was never written");
            cache.put(k, k ^ 0x55);
            assert_eq!(cache.get(k), k ^ 0x55, "{kind}: read after write of {k}");
        }
    }
}

#[test]
fn every_variant_holds_the_full_domain() {
    for kind in CacheKind::ALL {
        let mut cache = new_cache(kind, kind.default_capacity(MASK));
        populate(&mut *cache, MASK);
        assert_eq!(cache.len(), MASK as usize + 1, "{kind}: entry count");
        assert_eq!(
            verify_domain(&*cache, MASK).unwrap(),
            u64::from(MASK) + 1,
            "{kind}: full-domain read back"
        );
    }
}

#[test]
fn unshared_and_fixed_table_agree() {
    let mut map = UnsharedMap::with_capacity(4096);
    let mut table = FixedHashTable::new(1000);
    for i in 0..10_000u32 {
        let k = i.wrapping_mul(2_654_435_761) & 0xfff;
        map.put(k, i);
        table.put(k, i);
    }
    assert_eq!(map.len(), table.len());
    for k in 0..=0xfff {
        assert_eq!(map.get(k), table.get(k), "key {k}");
    }
}

/// Runs `threads` workers that hammer overlapping keys with put/get, then
/// checks that every key still masks back to itself.
fn hammer_shared<C>(cache: Arc<C>, threads: usize, iters: u32)
where
    C: SharedCache + 'static,
{
    for k in 0..=MASK {
        cache.put(k, k);
    }

    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = Vec::new();
    for t in 0..threads as u32 {
        let c = Arc::clone(&cache);
        let b = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            b.wait();
            for i in 0..iters {
                let k = (i * 7 + t) & MASK;
                c.put(k, k | ((t + 1) << 20));
                let v = c.get((k + 1) & MASK);
                assert_eq!(v & MASK, (k + 1) & MASK, "torn read on key {}", k + 1);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    for k in 0..=MASK {
        assert_eq!(cache.get(k) & MASK, k, "key {k} corrupted");
    }
}

#[test]
fn global_lock_map_survives_concurrent_put_get() {
    hammer_shared(Arc::new(GlobalLockMap::with_capacity(1 << 16)), 4, 50_000);
}

#[test]
fn sharded_map_survives_concurrent_put_get() {
    hammer_shared(Arc::new(ConcurrentShardedMap::with_capacity(1 << 16)), 4, 50_000);
}

#[test]
fn dash_map_survives_concurrent_put_get() {
    hammer_shared(Arc::new(DashMapCache::with_capacity(1 << 16)), 4, 50_000);
}

#[test]
fn channel_cache_survives_concurrent_put_get() {
    hammer_shared(Arc::new(ChannelCache::with_capacity(1 << 16)), 4, 10_000);
}

#[test]
fn shared_fixed_table_survives_concurrent_put_get() {
    hammer_shared(Arc::new(SharedFixedTable::with_capacity(1 << 12)), 4, 50_000);
}

#[test]
fn only_synchronized_variants_are_shareable() {
    for kind in CacheKind::ALL {
        let cache = new_cache(kind, 16);
        assert_eq!(
            cache.as_shared().is_some(),
            matches!(
                kind,
                CacheKind::Lock
                    | CacheKind::Concurrent
                    | CacheKind::Dash
                    | CacheKind::Channel
                    | CacheKind::SharedInt
            ),
            "{kind}"
        );
    }
}
