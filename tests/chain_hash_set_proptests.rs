// ChainHashSet property tests (public API only).
//
// Property 1: uniqueness. For any insert sequence, `len()` equals the number
//  of distinct keys and iteration yields each of them exactly once.
// Property 2: insert/erase/count consistency against a BTreeSet model, with
//  erase of absent keys leaving `len()` unchanged.
// Property 3: clone and equality. A clone equals its source, holds the same
//  keys, and is unaffected by later mutation of the source.
use chain_hashset::{ChainHashSet, SetConfig};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Property 1: uniqueness and iteration completeness.
proptest! {
    #[test]
    fn prop_uniqueness(keys in proptest::collection::vec(0u16..300, 0..800)) {
        let mut s: ChainHashSet<u16> = ChainHashSet::new();
        for &k in &keys {
            let _ = s.insert(k);
            prop_assert_eq!(s.count(&k), 1);
        }
        let distinct: BTreeSet<u16> = keys.iter().copied().collect();
        prop_assert_eq!(s.len(), distinct.len());

        let yielded: Vec<u16> = s.iter().copied().collect();
        prop_assert_eq!(yielded.len(), s.len());
        let yielded_set: BTreeSet<u16> = yielded.into_iter().collect();
        prop_assert_eq!(yielded_set, distinct);
    }
}

// Property 2: model equivalence under mixed insert/erase, small config.
proptest! {
    #[test]
    fn prop_insert_erase_count(
        ops in proptest::collection::vec((any::<bool>(), 0u8..64), 1..300),
        buckets in 1usize..9,
        factor in 1usize..4,
    ) {
        let cfg = SetConfig::builder()
            .initial_buckets(buckets)
            .max_load_factor(factor)
            .build()
            .unwrap();
        let mut s: ChainHashSet<u8> = ChainHashSet::with_config(cfg);
        let mut model = BTreeSet::new();

        for (insert, k) in ops {
            if insert {
                let (_, inserted) = s.insert(k);
                prop_assert_eq!(inserted, model.insert(k));
                prop_assert_eq!(s.count(&k), 1);
            } else {
                let before = s.len();
                let removed = s.erase(&k);
                prop_assert_eq!(removed, usize::from(model.remove(&k)));
                prop_assert_eq!(s.count(&k), 0);
                prop_assert_eq!(s.len(), before - removed);
            }
            prop_assert_eq!(s.len(), model.len());
            prop_assert!(s.len() <= s.bucket_count() * factor, "load stays within threshold");
            prop_assert!(s.bucket_count() >= buckets);
        }

        let seen: BTreeSet<u8> = s.iter().copied().collect();
        prop_assert_eq!(seen, model);
    }
}

// Property 3: clones are equal and independent.
proptest! {
    #[test]
    fn prop_clone_equality(keys in proptest::collection::btree_set(any::<i64>(), 0..200), victim in any::<prop::sample::Index>()) {
        let mut src: ChainHashSet<i64> = keys.iter().copied().collect();
        let copy = src.clone();
        prop_assert!(copy == src);
        let copy_keys: BTreeSet<i64> = copy.iter().copied().collect();
        prop_assert_eq!(&copy_keys, &keys);

        if !keys.is_empty() {
            let k = *keys.iter().nth(victim.index(keys.len())).unwrap();
            prop_assert_eq!(src.erase(&k), 1);
            prop_assert!(copy != src);
            prop_assert_eq!(copy.count(&k), 1);
        }
    }
}
