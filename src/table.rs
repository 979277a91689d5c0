//! ChainTable: bucket array of chain heads over a slotmap arena of entries.
//!
//! Every entry lives in `nodes`; a bucket only stores the id of its chain
//! head and each entry stores the id of its successor. Dropping the table
//! drops the arena, and with it every chain.

use core::borrow::Borrow;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Generational id of one chain entry. Stable across rehash.
    pub(crate) struct EntryId;
}

#[derive(Debug, Clone)]
struct Node<K> {
    key: K,
    hash: u64,
    next: Option<EntryId>,
}

#[derive(Debug)]
pub(crate) struct ChainTable<K> {
    heads: Vec<Option<EntryId>>,
    nodes: SlotMap<EntryId, Node<K>>, // owns every entry of every chain
}

impl<K> ChainTable<K> {
    pub(crate) fn with_buckets(buckets: usize) -> Self {
        debug_assert!(buckets > 0, "a chain table needs at least one bucket");
        Self {
            heads: vec![None; buckets.max(1)],
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Bucket router: `hash mod bucket_count` for the current bucket count.
    #[inline]
    pub(crate) fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    pub(crate) fn head(&self, bucket: usize) -> Option<EntryId> {
        self.heads.get(bucket).copied().flatten()
    }

    pub(crate) fn key(&self, id: EntryId) -> Option<&K> {
        self.nodes.get(id).map(|n| &n.key)
    }

    /// Keys of one bucket, head first.
    pub(crate) fn chain(&self, bucket: usize) -> impl Iterator<Item = &K> + '_ {
        let mut cur = self.head(bucket);
        core::iter::from_fn(move || {
            let node = self.nodes.get(cur?)?;
            cur = node.next;
            Some(&node.key)
        })
    }

    pub(crate) fn chain_find<Q>(&self, bucket: usize, hash: u64, q: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.head(bucket);
        while let Some(id) = cur {
            let node = self.nodes.get(id)?;
            if node.hash == hash && node.key.borrow() == q {
                return Some(id);
            }
            cur = node.next;
        }
        None
    }

    /// Links a new entry as the head of `bucket`. No duplicate check.
    pub(crate) fn chain_insert_front(&mut self, bucket: usize, key: K, hash: u64) -> EntryId {
        let next = self.heads[bucket];
        let id = self.nodes.insert(Node { key, hash, next });
        self.heads[bucket] = Some(id);
        id
    }

    /// Unlinks and frees the first matching entry of `bucket`.
    pub(crate) fn chain_erase<Q>(&mut self, bucket: usize, hash: u64, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut prev: Option<EntryId> = None;
        let mut cur = self.head(bucket);
        while let Some(id) = cur {
            let node = self.nodes.get(id)?;
            if node.hash == hash && node.key.borrow() == q {
                let next = node.next;
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.nodes[p].next = next,
                }
                return self.nodes.remove(id).map(|n| n.key);
            }
            prev = Some(id);
            cur = node.next;
        }
        None
    }

    /// Unchecked insert: routes by `hash` and links at the chain head.
    pub(crate) fn insert_unchecked(&mut self, key: K, hash: u64) -> EntryId {
        let bucket = self.bucket_index(hash);
        self.chain_insert_front(bucket, key, hash)
    }

    /// First non-empty bucket at or after `start`, with its head.
    pub(crate) fn first_from(&self, start: usize) -> Option<(usize, EntryId)> {
        self.heads
            .get(start..)?
            .iter()
            .enumerate()
            .find_map(|(offset, head)| head.map(|id| (start + offset, id)))
    }

    /// Position after `(bucket, id)` in table order.
    pub(crate) fn successor(&self, bucket: usize, id: EntryId) -> Option<(usize, EntryId)> {
        match self.nodes.get(id).and_then(|n| n.next) {
            Some(next) => Some((bucket, next)),
            None => self.first_from(bucket + 1),
        }
    }

    /// Entry ids in table order: bucket 0 upward, each chain head first.
    pub(crate) fn entry_ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        let mut pos = self.first_from(0);
        core::iter::from_fn(move || {
            let (bucket, id) = pos?;
            pos = self.successor(bucket, id);
            Some(id)
        })
    }

    /// `(stored hash, key)` pairs in table order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (u64, &K)> + '_ {
        self.entry_ids()
            .filter_map(move |id| self.nodes.get(id).map(|n| (n.hash, &n.key)))
    }

    /// Doubles the bucket count and relinks every entry by its stored hash.
    /// Entry ids (and the keys they own) are untouched.
    pub(crate) fn grow(&mut self) {
        let old_buckets = self.bucket_count();
        let Some(new_buckets) = old_buckets.checked_mul(2) else {
            return;
        };
        let order: Vec<EntryId> = self.entry_ids().collect();
        tracing::debug!(old_buckets, new_buckets, len = self.len(), "rehashing chain table");

        self.heads = vec![None; new_buckets];
        for id in order {
            self.link_front(id);
        }
    }

    fn link_front(&mut self, id: EntryId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let bucket = (node.hash % self.heads.len() as u64) as usize;
        node.next = self.heads[bucket];
        self.heads[bucket] = Some(id);
    }

    /// Consumes the table, yielding keys in table order.
    pub(crate) fn into_keys(mut self) -> Vec<K> {
        let order: Vec<EntryId> = self.entry_ids().collect();
        order
            .into_iter()
            .filter_map(|id| self.nodes.remove(id).map(|n| n.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests pass the key itself as its hash so bucket placement is `key % buckets`.
    fn table_with(buckets: usize, keys: &[u64]) -> ChainTable<u64> {
        let mut t = ChainTable::with_buckets(buckets);
        for &k in keys {
            t.insert_unchecked(k, k);
        }
        t
    }

    fn chain_of(t: &ChainTable<u64>, bucket: usize) -> Vec<u64> {
        t.chain(bucket).copied().collect()
    }

    /// Invariant: insert-front makes the newest entry the chain head.
    #[test]
    fn insert_front_orders_newest_first() {
        let t = table_with(7, &[3, 10, 17]);
        assert_eq!(chain_of(&t, 3), vec![17, 10, 3]);
        assert_eq!(t.len(), 3);
        assert!(t.head(0).is_none());
    }

    /// Invariant: find stops at the first equal key and misses absent keys
    /// even when they share the bucket.
    #[test]
    fn chain_find_hits_and_misses() {
        let t = table_with(7, &[3, 10, 17]);
        let id = t.chain_find(3, 10, &10).expect("present");
        assert_eq!(t.key(id), Some(&10));
        assert!(t.chain_find(3, 24, &24).is_none());
        assert!(t.chain_find(4, 4, &4).is_none());
    }

    /// Invariant: erase unlinks the head, a middle entry and the tail, keeping
    /// the remaining chain intact each time.
    #[test]
    fn chain_erase_head_middle_tail() {
        // Chain in bucket 3: 31 -> 24 -> 17 -> 10 -> 3
        let mut t = table_with(7, &[3, 10, 17, 24, 31]);
        assert_eq!(chain_of(&t, 3), vec![31, 24, 17, 10, 3]);

        assert_eq!(t.chain_erase(3, 31, &31), Some(31));
        assert_eq!(chain_of(&t, 3), vec![24, 17, 10, 3]);

        assert_eq!(t.chain_erase(3, 17, &17), Some(17));
        assert_eq!(chain_of(&t, 3), vec![24, 10, 3]);

        assert_eq!(t.chain_erase(3, 3, &3), Some(3));
        assert_eq!(chain_of(&t, 3), vec![24, 10]);

        assert_eq!(t.chain_erase(3, 3, &3), None);
        assert_eq!(t.len(), 2);

        assert_eq!(t.chain_erase(3, 10, &10), Some(10));
        assert_eq!(t.chain_erase(3, 24, &24), Some(24));
        assert!(t.head(3).is_none());
        assert_eq!(t.len(), 0);
    }

    /// Invariant: a single-entry chain becomes empty when its only entry goes.
    #[test]
    fn chain_erase_sole_entry() {
        let mut t = table_with(7, &[5]);
        assert_eq!(t.chain_erase(5, 5, &5), Some(5));
        assert!(t.head(5).is_none());
        assert!(t.first_from(0).is_none());
    }

    /// Invariant: table order skips empty buckets, including runs of them, and
    /// ends cleanly after the last bucket.
    #[test]
    fn successor_skips_empty_buckets() {
        // Buckets 0, 1 and 6 populated; 2..=5 empty.
        let t = table_with(7, &[0, 1, 8, 6]);
        let (b, id) = t.first_from(0).unwrap();
        assert_eq!((b, t.key(id)), (0, Some(&0)));
        let (b, id) = t.successor(b, id).unwrap();
        assert_eq!((b, t.key(id)), (1, Some(&8)));
        let (b, id) = t.successor(b, id).unwrap();
        assert_eq!((b, t.key(id)), (1, Some(&1)));
        let (b, id) = t.successor(b, id).unwrap();
        assert_eq!((b, t.key(id)), (6, Some(&6)));
        assert!(t.successor(b, id).is_none());
        assert!(t.first_from(7).is_none());
        assert!(t.first_from(100).is_none());
    }

    /// Invariant: grow doubles the bucket count, keeps every entry and its id,
    /// and re-routes each key by `hash mod new_count`.
    #[test]
    fn grow_preserves_entries_and_ids() {
        let mut t = table_with(7, &[]);
        let ids: Vec<(u64, EntryId)> = (0..30u64).map(|k| (k, t.insert_unchecked(k, k))).collect();
        t.grow();
        assert_eq!(t.bucket_count(), 14);
        assert_eq!(t.len(), 30);
        for (k, id) in ids {
            assert_eq!(t.key(id), Some(&k));
            let bucket = t.bucket_index(k);
            assert_eq!(bucket, (k % 14) as usize);
            assert_eq!(t.chain_find(bucket, k, &k), Some(id));
        }
        assert_eq!(t.entry_ids().count(), 30);
    }

    /// Invariant: owning traversal yields keys in table order.
    #[test]
    fn into_keys_follows_table_order() {
        let t = table_with(7, &[3, 17, 42]);
        let expected: Vec<u64> = t.entries().map(|(_, k)| *k).collect();
        assert_eq!(expected, vec![42, 17, 3]);
        assert_eq!(t.into_keys(), expected);
    }
}
