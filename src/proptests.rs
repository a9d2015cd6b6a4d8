use super::*;
use crate::cache::FixedHashTable;

use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Put(u32, u32),
    Get(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..256, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        (0u32..256).prop_map(Op::Get),
    ]
}

proptest! {
    /// The chained table agrees with a `HashMap` model for any op sequence,
    /// even when keys outnumber buckets many times over.
    #[test]
    fn fixed_table_matches_model(capacity in 1usize..64, ops in prop::collection::vec(op(), 0..512)) {
        let mut table = FixedHashTable::new(capacity);
        let mut model: HashMap<u32, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    table.put(k, v);
                    model.insert(k, v);
                }
                Op::Get(k) => {
                    prop_assert_eq!(table.get(k), model.get(&k).copied().unwrap_or(0));
                }
            }
        }

        prop_assert_eq!(table.len(), model.len());
        prop_assert!(table.bucket_count().is_power_of_two());
        prop_assert!(table.bucket_count() >= capacity);
        for (k, v) in &model {
            prop_assert_eq!(table.get(*k), *v);
        }
    }

    /// Every variant agrees with the model on the same op sequence.
    #[test]
    fn every_variant_matches_model(ops in prop::collection::vec(op(), 0..256)) {
        for kind in CacheKind::ALL {
            let mut cache = new_cache(kind, 64);
            let mut model: HashMap<u32, u32> = HashMap::new();
            for op in &ops {
                match *op {
                    Op::Put(k, v) => {
                        cache.put(k, v);
                        model.insert(k, v);
                    }
                    Op::Get(k) => {
                        prop_assert_eq!(cache.get(k), model.get(&k).copied().unwrap_or(0));
                    }
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }
}
