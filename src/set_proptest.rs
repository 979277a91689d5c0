#![cfg(test)]

// Property tests for ChainHashSet kept inside the crate so they can check
// table-level invariants (bucket routing, chain lengths) directly.

use crate::config::SetConfig;
use crate::set::ChainHashSet;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Erase(usize),
    Take(usize),
    Find(usize),
    Contains(String),
    Iterate,
    Clear,
    CloneEq,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Insert),
            2 => idx.clone().prop_map(OpI::Erase),
            1 => idx.clone().prop_map(OpI::Take),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
            1 => Just(OpI::CloneEq),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn tiny_config() -> SetConfig {
    // One bucket and a load factor of 1 so short scenarios rehash repeatedly.
    SetConfig::builder()
        .initial_buckets(1)
        .max_load_factor(1)
        .build()
        .unwrap()
}

// Table-level invariants checked after every step:
// - every key sits in the bucket its hash routes to,
// - chain lengths sum to `len()`,
// - traversal yields `len()` distinct keys, each counted once.
fn check_structure<S: BuildHasher>(sut: &ChainHashSet<Key, S>) -> Result<(), TestCaseError> {
    let mut total = 0;
    for b in 0..sut.bucket_count() {
        total += sut.bucket_len(b);
    }
    prop_assert_eq!(total, sut.len());

    let mut seen = BTreeSet::new();
    let mut cursor = sut.begin();
    while !cursor.is_end() {
        let k = cursor.key();
        prop_assert_eq!(cursor.bucket(), Some(sut.bucket(k)));
        prop_assert_eq!(sut.count(k), 1);
        prop_assert!(seen.insert(k.clone()), "key yielded twice: {:?}", k);
        cursor.advance();
    }
    prop_assert_eq!(seen.len(), sut.len());
    prop_assert_eq!(sut.iter().len(), sut.len());
    Ok(())
}

fn run_scenario<S>(
    mut sut: ChainHashSet<Key, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashSet<Key> = HashSet::new();
    let initial_buckets = sut.config().initial_buckets();

    for op in ops {
        let buckets_before = sut.bucket_count();
        match op {
            OpI::Insert(i) => {
                let k = key_from(pool, i);
                let already = model.contains(&k);
                let (cursor, inserted) = sut.insert(k.clone());
                prop_assert_eq!(cursor.get(), Some(&k));
                prop_assert_eq!(inserted, !already, "inserted iff key was absent");
                model.insert(k.clone());
                prop_assert_eq!(sut.count(&k), 1);
                prop_assert!(sut.bucket_count() >= buckets_before, "bucket count never shrinks");
            }
            OpI::Erase(i) => {
                let k = key_from(pool, i);
                let expected = usize::from(model.remove(&k));
                prop_assert_eq!(sut.erase(&k), expected);
                prop_assert_eq!(sut.count(&k), 0);
                prop_assert_eq!(sut.bucket_count(), buckets_before, "erase never rehashes");
            }
            OpI::Take(i) => {
                let k = key_from(pool, i);
                let expected = model.take(&k);
                prop_assert_eq!(sut.take(&k), expected);
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.is_end(), !model.contains(&k));
                if let Some(found) = c.get() {
                    prop_assert_eq!(found, &k);
                }
            }
            OpI::Contains(s) => {
                let has_model = model.iter().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().cloned().collect();
                let m_keys: BTreeSet<_> = model.iter().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), initial_buckets);
            }
            OpI::CloneEq => {
                let copy = sut.clone();
                prop_assert!(copy == sut);
                prop_assert_eq!(copy.len(), sut.len());
                check_structure(&copy)?;
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashSet,
// with a config small enough that most scenarios cross several rehashes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ChainHashSet<Key> = ChainHashSet::with_config(tiny_config());
        run_scenario(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain, so
// erase is exercised at the head, middle and tail of long chains.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: ChainHashSet<Key, ConstBuildHasher> =
            ChainHashSet::with_config_and_hasher(tiny_config(), ConstBuildHasher);
        run_scenario(sut, &pool, ops)?;
    }
}

// Property: keys present before a growth-triggering insert are all present
// after it, and the triggering insert adds exactly one key.
proptest! {
    #[test]
    fn prop_rehash_preserves_membership(keys in proptest::collection::hash_set(any::<u32>(), 1..400)) {
        let mut sut: ChainHashSet<u32> = ChainHashSet::new();
        for k in keys {
            let before: BTreeSet<u32> = sut.iter().copied().collect();
            let buckets = sut.bucket_count();
            let (_, inserted) = sut.insert(k);
            prop_assert!(inserted);
            if sut.bucket_count() != buckets {
                prop_assert_eq!(sut.bucket_count(), buckets * 2);
                let after: BTreeSet<u32> = sut.iter().copied().collect();
                prop_assert!(before.is_subset(&after));
                prop_assert_eq!(after.len(), before.len() + 1);
            }
            prop_assert_eq!(sut.len(), before.len() + 1);
        }
    }
}

#[test]
fn key_hash_is_stable_for_borrowed_lookup() {
    // `Key` and `str` must hash identically for borrowed lookup to route.
    let s = ChainHashSet::<Key>::new();
    let owned = Key("abc".to_string());
    let mut h1 = std::collections::hash_map::DefaultHasher::new();
    owned.hash(&mut h1);
    let mut h2 = std::collections::hash_map::DefaultHasher::new();
    "abc".hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
    assert_eq!(s.bucket(&owned), s.bucket("abc"));
}
