//! Property tests for the LRU cache and the instant interner built on it.

use std::collections::VecDeque;
use std::sync::Arc;

use proptest::prelude::*;

use chronos_cache::{InstantInterner, LruCache};
use test_fixtures::strategies::any_instant;

#[derive(Debug, Clone)]
enum Op {
    Put(u8, u32),
    Get(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..16u8, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => (0..16u8).prop_map(Op::Get),
        1 => (0..16u8).prop_map(Op::Remove),
    ]
}

/// Reference model: a recency queue, least recent at the front.
#[derive(Default)]
struct Model {
    order: VecDeque<(u8, u32)>,
}

impl Model {
    fn take(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        self.order.remove(pos).map(|(_, v)| v)
    }

    fn put(&mut self, key: u8, value: u32, capacity: usize) -> Option<u32> {
        let previous = self.take(key);
        self.order.push_back((key, value));
        if self.order.len() > capacity {
            self.order.pop_front();
        }
        previous
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let value = self.take(key)?;
        self.order.push_back((key, value));
        Some(value)
    }
}

proptest! {
    #[test]
    fn prop_lru_matches_recency_model(capacity in 1usize..6, ops in prop::collection::vec(op(), 0..64)) {
        let mut cache = LruCache::new(capacity).unwrap();
        let mut model = Model::default();
        for op in ops {
            match op {
                Op::Put(k, v) => prop_assert_eq!(cache.put(k, v), model.put(k, v, capacity)),
                Op::Get(k) => prop_assert_eq!(cache.get(&k).copied(), model.get(k)),
                Op::Remove(k) => prop_assert_eq!(cache.remove(&k), model.take(k)),
            }
            prop_assert!(cache.len() <= capacity);
        }
        let keys: Vec<u8> = cache.keys().copied().collect();
        let expected: Vec<u8> = model.order.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_first_key_evicted_after_overflow(capacity in 1usize..10) {
        let mut cache = LruCache::new(capacity).unwrap();
        for key in 0..=capacity {
            cache.put(key, key);
        }
        prop_assert!(cache.get(&0).is_none());
        for key in 1..=capacity {
            prop_assert_eq!(cache.get(&key), Some(&key));
        }
    }

    #[test]
    fn prop_interner_shares_equal_instants(instants in prop::collection::vec(any_instant(8), 1..32)) {
        let mut interner = InstantInterner::new(64).unwrap();
        let first: Vec<_> = instants.iter().map(|i| interner.intern(i.clone())).collect();
        for (instant, shared) in instants.iter().zip(&first) {
            let again = interner.intern(instant.clone());
            prop_assert!(Arc::ptr_eq(&again, shared));
        }
    }
}
