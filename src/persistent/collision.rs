//! Collision buckets for keys whose hashes agree down to the last trie level.
//!
//! Once two distinct keys land in the same slot at the deepest level there
//! are no hash bits left to tell them apart, so they are kept together in a
//! [`CollisionBucket`] and told apart by linear scan with the trie's
//! equivalence relation. The pairs live in an [`ImmutableStack`], which keeps
//! prepend O(1) and lets bucket versions share their untouched cells.

use std::borrow::Borrow;

use super::ReferenceCounter;
use super::hamt::Entry;
use super::stack::{ImmutableStack, ImmutableStackIterator};
use crate::typeclass::EquivalenceRelation;

/// Pairs sharing a single full hash.
///
/// While attached to a trie the bucket is never empty and holds at most one
/// pair per equivalence class of keys.
pub(crate) struct CollisionBucket<K, V> {
    hash: u32,
    entries: ImmutableStack<ReferenceCounter<Entry<K, V>>>,
}

impl<K, V> CollisionBucket<K, V> {
    /// Creates a bucket holding `existing` and `incoming`, keyed by the hash
    /// of `existing`.
    pub(crate) fn pair(
        existing: ReferenceCounter<Entry<K, V>>,
        incoming: ReferenceCounter<Entry<K, V>>,
    ) -> Self {
        Self {
            hash: existing.hash,
            entries: ImmutableStack::new().cons(existing).cons(incoming),
        }
    }

    /// The hash every pair in this bucket shares.
    #[inline]
    pub(crate) const fn hash(&self) -> u32 {
        self.hash
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> ImmutableStackIterator<'_, ReferenceCounter<Entry<K, V>>> {
        self.entries.iter()
    }

    /// Finds the value stored under a key equivalent to `key`.
    ///
    /// A bucket keyed by a different hash cannot hold the key, so it answers
    /// `None` without scanning.
    pub(crate) fn lookup<Q, E>(&self, key: &Q, hash: u32, equivalence: &E) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
    {
        if hash != self.hash {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| equivalence.equivalent(key, entry.key.borrow()))
            .map(|entry| &entry.value)
    }

    /// Returns a bucket where `entry` replaces any pair with an equivalent
    /// key.
    pub(crate) fn insert<E>(&self, entry: ReferenceCounter<Entry<K, V>>, equivalence: &E) -> Self
    where
        E: EquivalenceRelation<K>,
    {
        let survivors = self
            .without(&entry.key, equivalence)
            .unwrap_or_else(|| self.entries.clone());
        Self {
            hash: self.hash,
            entries: survivors.cons(entry),
        }
    }

    /// Returns the bucket without any pair equivalent to `key`, or `None`
    /// when nothing would be removed.
    ///
    /// The result may be empty; the owning node then drops the slot.
    pub(crate) fn remove<Q, E>(&self, key: &Q, hash: u32, equivalence: &E) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
    {
        if hash != self.hash {
            return None;
        }
        self.without(key, equivalence).map(|entries| Self {
            hash: self.hash,
            entries,
        })
    }

    /// Re-conses every pair whose key is not equivalent to `key`.
    ///
    /// Survivor order is not preserved.
    fn without<Q, E>(
        &self,
        key: &Q,
        equivalence: &E,
    ) -> Option<ImmutableStack<ReferenceCounter<Entry<K, V>>>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
    {
        let (survivors, removed) = self.entries.iter().fold(
            (ImmutableStack::new(), false),
            |(survivors, removed), entry| {
                if equivalence.equivalent(key, entry.key.borrow()) {
                    (survivors, true)
                } else {
                    (survivors.cons(ReferenceCounter::clone(entry)), removed)
                }
            },
        );
        removed.then_some(survivors)
    }
}
