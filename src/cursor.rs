//! Cursor: a positioned, forward-only view into a set's bucket array.
//!
//! A cursor is `(table, bucket index, entry)`; the end cursor has no entry.
//! Advancing walks the current chain and then scans forward over empty
//! buckets. Cursors borrow the set, so the set cannot be mutated while one
//! is alive.

use crate::table::{ChainTable, EntryId};
use core::fmt;
use core::iter::FusedIterator;

pub struct Cursor<'a, K> {
    table: Option<&'a ChainTable<K>>,
    bucket: usize,
    entry: Option<EntryId>,
}

impl<'a, K> Cursor<'a, K> {
    pub(crate) fn at(table: &'a ChainTable<K>, bucket: usize, entry: EntryId) -> Self {
        Self {
            table: Some(table),
            bucket,
            entry: Some(entry),
        }
    }

    /// First key of `table` in traversal order, or the end cursor.
    pub(crate) fn first(table: &'a ChainTable<K>) -> Self {
        match table.first_from(0) {
            Some((bucket, entry)) => Self::at(table, bucket, entry),
            None => Self::end(),
        }
    }

    /// The end sentinel. Equal to every other end cursor.
    pub const fn end() -> Self {
        Self {
            table: None,
            bucket: 0,
            entry: None,
        }
    }

    pub fn is_end(&self) -> bool {
        self.entry.is_none()
    }

    /// Key under the cursor; `None` for the end cursor.
    pub fn get(&self) -> Option<&'a K> {
        self.table?.key(self.entry?)
    }

    /// Key under the cursor.
    ///
    /// # Panics
    /// Panics when called on the end cursor.
    pub fn key(&self) -> &'a K {
        match self.get() {
            Some(k) => k,
            None => panic!("dereferenced the end cursor"),
        }
    }

    /// Bucket index of the current entry; `None` for the end cursor.
    pub fn bucket(&self) -> Option<usize> {
        self.entry.map(|_| self.bucket)
    }

    /// Moves to the next key in traversal order, becoming the end cursor
    /// after the last one. Advancing the end cursor is a caller bug: it
    /// asserts in debug builds and does nothing in release builds.
    pub fn advance(&mut self) {
        debug_assert!(self.entry.is_some(), "advanced past the end cursor");
        let (Some(table), Some(entry)) = (self.table, self.entry) else {
            return;
        };
        match table.successor(self.bucket, entry) {
            Some((bucket, next)) => {
                self.bucket = bucket;
                self.entry = Some(next);
            }
            None => {
                self.bucket = table.bucket_count();
                self.entry = None;
            }
        }
    }

    fn same_table(&self, other: &Self) -> bool {
        match (self.table, other.table) {
            (Some(a), Some(b)) => core::ptr::eq(a, b),
            _ => false,
        }
    }
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Cursor<'_, K> {}

impl<K> PartialEq for Cursor<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        match (self.entry, other.entry) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b && self.same_table(other),
            _ => false,
        }
    }
}

impl<K> Eq for Cursor<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for Cursor<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(key) => f
                .debug_struct("Cursor")
                .field("bucket", &self.bucket)
                .field("key", key)
                .finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Iterator over the keys of a `ChainHashSet`, in traversal order.
pub struct Iter<'a, K> {
    cursor: Cursor<'a, K>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(table: &'a ChainTable<K>) -> Self {
        Self {
            cursor: Cursor::first(table),
            remaining: table.len(),
        }
    }

    /// Cursor at the next key to be yielded.
    pub fn cursor(&self) -> Cursor<'a, K> {
        self.cursor
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.get()?;
        self.cursor.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
