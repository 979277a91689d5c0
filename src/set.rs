//! ChainHashSet: public set API over `ChainTable`.

use crate::config::SetConfig;
use crate::cursor::{Cursor, Iter};
use crate::table::{ChainTable, EntryId};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::io;

/// Default hasher: fixed-key aHash, so placement is reproducible across runs.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

/// An unordered set of unique keys stored in separately chained buckets.
///
/// Traversal order is bucket 0 upward, each chain newest-first. It is stable
/// between mutations but otherwise unspecified, and a clone may traverse in
/// a different order than its source.
pub struct ChainHashSet<K, S = DefaultHashBuilder> {
    hasher: S,
    config: SetConfig,
    table: ChainTable<K>,
}

impl<K> ChainHashSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_config_and_hasher(SetConfig::default(), DefaultHashBuilder::default())
    }

    pub fn with_config(config: SetConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K> Default for ChainHashSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> ChainHashSet<K, S> {
    pub fn with_config_and_hasher(config: SetConfig, hasher: S) -> Self {
        Self {
            hasher,
            table: ChainTable::with_buckets(config.initial_buckets()),
            config,
        }
    }

    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(SetConfig::default(), hasher)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Average chain length.
    pub fn load_factor(&self) -> f64 {
        self.table.len() as f64 / self.table.bucket_count() as f64
    }

    pub fn config(&self) -> &SetConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of keys chained in `bucket`; 0 for out-of-range buckets.
    pub fn bucket_len(&self, bucket: usize) -> usize {
        self.table.chain(bucket).count()
    }

    pub fn begin(&self) -> Cursor<'_, K> {
        Cursor::first(&self.table)
    }

    pub fn end(&self) -> Cursor<'_, K> {
        Cursor::end()
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.table)
    }

    /// Drops every key and restarts at the configured initial bucket count.
    pub fn clear(&mut self) {
        tracing::trace!(
            len = self.table.len(),
            buckets = self.table.bucket_count(),
            "clearing set"
        );
        self.table = ChainTable::with_buckets(self.config.initial_buckets());
    }

    /// Exchanges the whole contents of two sets without touching any key.
    pub fn swap(&mut self, other: &mut Self) {
        tracing::trace!(left = self.len(), right = other.len(), "swapping sets");
        core::mem::swap(self, other);
    }

    /// Writes one line per bucket, `[i]: k1 -> k2` or `[i]: empty`.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: fmt::Debug,
    {
        for bucket in 0..self.table.bucket_count() {
            write!(out, "[{bucket}]: ")?;
            let mut chain = self.table.chain(bucket).peekable();
            if chain.peek().is_none() {
                writeln!(out, "empty")?;
                continue;
            }
            for (i, key) in chain.enumerate() {
                if i > 0 {
                    write!(out, " -> ")?;
                }
                write!(out, "{key:?}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Links a key known to be absent and runs the growth check.
    fn insert_unique(&mut self, key: K, hash: u64) -> EntryId {
        let id = self.table.insert_unchecked(key, hash);
        if self
            .config
            .exceeds_load(self.table.len(), self.table.bucket_count())
        {
            self.table.grow();
        }
        id
    }
}

impl<K, S> ChainHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Bucket `q` routes to under the current bucket count.
    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.bucket_index(self.make_hash(q))
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.count(q) == 1
    }

    /// 1 if `q` is present, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let bucket = self.table.bucket_index(hash);
        usize::from(self.table.chain_find(bucket, hash, q).is_some())
    }

    /// Cursor at `q`, or the end cursor when absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let bucket = self.table.bucket_index(hash);
        match self.table.chain_find(bucket, hash, q) {
            Some(id) => Cursor::at(&self.table, bucket, id),
            None => Cursor::end(),
        }
    }

    /// Inserts `key` unless an equal key is present. Returns a cursor at the
    /// stored key and whether an insertion happened. A rejected duplicate is
    /// dropped and the set is left untouched.
    pub fn insert(&mut self, key: K) -> (Cursor<'_, K>, bool) {
        let hash = self.make_hash(&key);
        let bucket = self.table.bucket_index(hash);
        if let Some(id) = self.table.chain_find(bucket, hash, &key) {
            return (Cursor::at(&self.table, bucket, id), false);
        }

        let id = self.insert_unique(key, hash);
        // Growth keeps the entry id but may move it to another bucket.
        let bucket = self.table.bucket_index(hash);
        (Cursor::at(&self.table, bucket, id), true)
    }

    /// Removes `q`; returns how many keys were removed (0 or 1).
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.take(q).is_some())
    }

    /// Removes `q` and hands back the stored key.
    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let bucket = self.table.bucket_index(hash);
        self.table.chain_erase(bucket, hash, q)
    }

    /// Replaces the contents with the keys of `iter`, skipping duplicates.
    pub fn assign<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.clear();
        self.extend(iter);
    }
}

impl<K, S> Clone for ChainHashSet<K, S>
where
    K: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut out = Self::with_config_and_hasher(self.config, self.hasher.clone());
        for (hash, key) in self.table.entries() {
            let _ = out.insert_unique(key.clone(), hash);
        }
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.hasher = source.hasher.clone();
        self.config = source.config;
        self.table = ChainTable::with_buckets(self.config.initial_buckets());
        for (hash, key) in source.table.entries() {
            let _ = self.insert_unique(key.clone(), hash);
        }
    }
}

impl<K, S> PartialEq for ChainHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, S> Eq for ChainHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, S> fmt::Debug for ChainHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S> Extend<K> for ChainHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<'a, K, S> Extend<&'a K> for ChainHashSet<K, S>
where
    K: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K, S> FromIterator<K> for ChainHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<K, const N: usize> From<[K; N]> for ChainHashSet<K>
where
    K: Eq + Hash,
{
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K, S> IntoIterator for &'a ChainHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S> IntoIterator for ChainHashSet<K, S> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.table.into_keys().into_iter(),
        }
    }
}

/// Owning iterator over the keys of a `ChainHashSet`, in traversal order.
pub struct IntoIter<K> {
    it: std::vec::IntoIter<K>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.it.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}
