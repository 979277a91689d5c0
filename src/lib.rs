//! chain-hashset: a single-threaded unordered set built on a separately
//! chained hash table, with explicit bucket cursors and doubling growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the bucket/chain engine small and checkable on its own, and
//!   put the set semantics (uniqueness, growth, equality) one layer up.
//! - Layers:
//!   - ChainTable<K>: bucket array of chain heads over a `slotmap` arena of
//!     entries. Provides the bucket router, the three chain primitives
//!     (find, insert-front, erase) and the doubling rehash.
//!   - ChainHashSet<K, S>: public API. Hashes keys once, checks for
//!     duplicates, runs the growth policy after each insertion.
//!   - Cursor<'a, K> / Iter<'a, K>: `(bucket, entry)` positions that walk a
//!     chain and then scan forward over empty buckets.
//!
//! Constraints
//! - Single-threaded; no interior mutability, so `&mut` serializes access.
//! - Unique keys. Inserting a present key is a no-op, never an error.
//! - Bucket count only grows (x2 whenever `len > buckets * max_load_factor`);
//!   `clear()` is the one operation that returns to the initial count.
//! - Keys are immutable post-insert; there is no `key_mut`.
//!
//! Chain ownership
//! - Chains link entries through generational arena ids instead of boxed
//!   nodes. Unlinking fixes one `Option<EntryId>` (a bucket head or a
//!   predecessor's `next`) and frees one slot, so a stale link can never
//!   resolve to a reused slot.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its precomputed `u64` hash; routing during rehash and
//!   cloning uses the stored hash, so `K: Hash` runs once per insertion.
//! - Rehash relinks entries in traversal order into a fresh bucket vector.
//!   Entry ids survive, so a key's logical position is preserved even though
//!   its bucket index changes.
//!
//! Cursor invalidation
//! - A cursor borrows the set. Mutating the set while a cursor is alive is
//!   rejected at compile time rather than detected at runtime.
//! - All end cursors compare equal, whichever set produced them.
//!
//! Notes and non-goals
//! - No ordered lookup, no concurrency, no persistence, no custom allocator.
//! - Allocation failure aborts, as with the standard collections.

mod config;
mod cursor;
mod error;
mod set;
mod set_proptest;
mod table;

// Public surface
pub use config::{SetConfig, SetConfigBuilder, DEFAULT_INITIAL_BUCKETS, DEFAULT_MAX_LOAD_FACTOR};
pub use cursor::{Cursor, Iter};
pub use error::ConfigError;
pub use set::{ChainHashSet, DefaultHashBuilder, IntoIter};
