//! Persistent (immutable) hash set.
//!
//! [`HashSet`] is a thin wrapper around `Hamt<T, ()>`: membership is the
//! presence of a key, and every operation returns a new set that shares
//! structure with the old one.
//!
//! # Examples
//!
//! ```rust
//! use shoki::persistent::HashSet;
//!
//! let set = HashSet::new().add(1).add(2).add(3);
//! assert!(set.contains(&1));
//! assert!(!set.contains(&4));
//!
//! // Structural sharing: the original set is preserved
//! let updated = set.add(4);
//! assert_eq!(set.size(), 3);
//! assert_eq!(updated.size(), 4);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

use super::hamt::{Hamt, HamtIterator};
use crate::typeclass::{
    EquivalenceRelation, HashingAlgorithm, ObjectEquals, ObjectHashCode, Sizable, SizeInfo,
};

/// A persistent (immutable) hash set based on [`Hamt`].
///
/// Elements are told apart by `E` and hashed by `H`, exactly like the keys
/// of the underlying trie.
pub struct HashSet<T, E = ObjectEquals, H = ObjectHashCode> {
    trie: Hamt<T, (), E, H>,
}

impl<T> HashSet<T> {
    /// Creates an empty set using the elements' own `Eq` and `Hash`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { trie: Hamt::new() }
    }
}

impl<T, E, H> HashSet<T, E, H> {
    /// Creates an empty set governed by the given strategies.
    #[must_use]
    pub fn empty(equivalence: E, hashing: H) -> Self {
        Self {
            trie: Hamt::empty(equivalence, hashing),
        }
    }

    /// Counts the elements by walking the whole set.
    #[must_use]
    pub fn size(&self) -> usize {
        self.trie.size()
    }

    /// Returns `true` if the set has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Iterates over the elements in unspecified order.
    #[must_use]
    pub fn iter(&self) -> HashSetIterator<'_, T> {
        HashSetIterator {
            inner: self.trie.iter(),
        }
    }
}

impl<T, E: Clone, H: Clone> HashSet<T, E, H> {
    /// Returns `true` if the set holds an element equivalent to `element`.
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
        H: HashingAlgorithm<Q>,
    {
        self.trie.contains(element)
    }

    /// Returns a set that also holds `element`.
    ///
    /// Adding an element equivalent to a member replaces that member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::HashSet;
    ///
    /// let set = HashSet::new().add("a").add("a");
    /// assert_eq!(set.size(), 1);
    /// ```
    #[must_use]
    pub fn add(&self, element: T) -> Self
    where
        E: EquivalenceRelation<T>,
        H: HashingAlgorithm<T>,
    {
        Self {
            trie: self.trie.put(element, ()),
        }
    }

    /// Returns a set without `element`.
    ///
    /// Removing a non-member returns a set sharing the receiver's storage.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
        H: HashingAlgorithm<Q>,
    {
        Self {
            trie: self.trie.remove(element),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the elements of a [`HashSet`].
pub struct HashSetIterator<'a, T> {
    inner: HamtIterator<'a, T, ()>,
}

impl<'a, T> Iterator for HashSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }
}

impl<'a, T, E, H> IntoIterator for &'a HashSet<T, E, H> {
    type Item = &'a T;
    type IntoIter = HashSetIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, E: Clone, H: Clone> Clone for HashSet<T, E, H> {
    fn clone(&self) -> Self {
        Self {
            trie: self.trie.clone(),
        }
    }
}

impl<T> Default for HashSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::hash::Hash + Eq> FromIterator<T> for HashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |set, element| set.add(element))
    }
}

impl<T, E, H> PartialEq for HashSet<T, E, H>
where
    E: EquivalenceRelation<T> + Clone,
    H: HashingAlgorithm<T> + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.trie == other.trie
    }
}

impl<T, E, H> Eq for HashSet<T, E, H>
where
    E: EquivalenceRelation<T> + Clone,
    H: HashingAlgorithm<T> + Clone,
{
}

impl<T: fmt::Debug, E, H> fmt::Debug for HashSet<T, E, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T, E, H> Sizable for HashSet<T, E, H> {
    fn size_info(&self) -> SizeInfo {
        self.trie.size_info()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, E, H> serde::Serialize for HashSet<T, E, H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct HashSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for HashSetVisitor<T>
where
    T: serde::Deserialize<'de> + std::hash::Hash + Eq,
{
    type Value = HashSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = HashSet::new();
        while let Some(element) = seq.next_element()? {
            set = set.add(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for HashSet<T>
where
    T: serde::Deserialize<'de> + std::hash::Hash + Eq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(HashSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(HashSet<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(HashSet<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
