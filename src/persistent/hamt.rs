//! Persistent (immutable) hash array mapped trie.
//!
//! This module provides [`Hamt`], an immutable map in which every update
//! returns a new version and leaves all earlier versions intact and usable.
//!
//! # Overview
//!
//! The trie branches 32 ways per level. A node stores only its populated
//! slots, densely, next to a [`Bitmap32`] recording which slots those are.
//! Each level consumes the next five bits of the key's 32-bit hash:
//!
//! - O(log32 N) get, put and remove
//! - O(N) size, recomputed by traversal on every call
//!
//! A populated slot holds one of three things: a single entry, a child node
//! one level down, or (at the deepest level) a collision bucket for keys
//! whose hashes are identical.
//!
//! Key identity is not taken from the key type. Every trie is built with an
//! [`EquivalenceRelation`] and a [`HashingAlgorithm`]; [`Hamt::new`] uses
//! [`ObjectEquals`] and [`ObjectHashCode`], which defer to `Eq` and `Hash`.
//!
//! # Examples
//!
//! ```rust
//! use shoki::persistent::Hamt;
//!
//! let map = Hamt::new()
//!     .put("one".to_string(), 1)
//!     .put("two".to_string(), 2);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.size(), 2);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.put("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(updated.get("one"), Some(&100));
//! ```
//!
//! # Structural Sharing
//!
//! An update copies only the nodes on the path from the root to the slot it
//! touches. Every other slot value (entries, child nodes and buckets alike)
//! is held behind a reference counter and shared with the previous version.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::bitmap::Bitmap32;
use super::collision::CollisionBucket;
use super::stack::ImmutableStackIterator;
use crate::typeclass::{
    EquivalenceRelation, Foldable, HashingAlgorithm, ObjectEquals, ObjectHashCode, Sizable,
    SizeInfo, TypeConstructor,
};

// =============================================================================
// Constants
// =============================================================================

/// The level at which a split builds a collision bucket instead of a node.
///
/// Nodes exist at levels 1 through 7; together they read all 32 hash bits.
pub(crate) const COLLISION_LEVEL: usize = 8;

// =============================================================================
// Node Definition
// =============================================================================

/// A key-value pair together with the full hash of its key.
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u32,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// The value stored in a populated slot.
pub(crate) enum Slot<K, V> {
    Entry(ReferenceCounter<Entry<K, V>>),
    Node(ReferenceCounter<Node<K, V>>),
    Collision(ReferenceCounter<CollisionBucket<K, V>>),
}

// Cloning a slot shares its payload; keys and values are never copied.
impl<K, V> Clone for Slot<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Entry(entry) => Self::Entry(ReferenceCounter::clone(entry)),
            Self::Node(node) => Self::Node(ReferenceCounter::clone(node)),
            Self::Collision(bucket) => Self::Collision(ReferenceCounter::clone(bucket)),
        }
    }
}

/// One level of the trie.
///
/// `slots[i]` belongs to the `i`-th populated slot of `bitmap`, so
/// `slots.len() == bitmap.population_count()` always holds.
pub(crate) struct Node<K, V> {
    bitmap: Bitmap32,
    slots: Box<[Slot<K, V>]>,
}

impl<K, V> Node<K, V> {
    fn empty() -> Self {
        Self {
            bitmap: Bitmap32::EMPTY,
            slots: Box::default(),
        }
    }

    fn from_parts(bitmap: Bitmap32, slots: Vec<Slot<K, V>>) -> Self {
        debug_assert_eq!(bitmap.population_count(), slots.len());
        Self {
            bitmap,
            slots: slots.into_boxed_slice(),
        }
    }

    #[inline]
    fn slot_at(&self, slot: usize) -> &Slot<K, V> {
        &self.slots[self.bitmap.density_below(slot)]
    }

    // -------------------------------------------------------------------------
    // Array surgery
    // -------------------------------------------------------------------------

    /// Returns a node with `value` placed in the unpopulated `slot`.
    fn insert_at(&self, slot: usize, value: Slot<K, V>) -> Self {
        let position = self.bitmap.density_below(slot);
        let mut slots = Vec::with_capacity(self.slots.len() + 1);
        slots.extend_from_slice(&self.slots[..position]);
        slots.push(value);
        slots.extend_from_slice(&self.slots[position..]);
        Self::from_parts(self.bitmap.populate(slot), slots)
    }

    /// Returns a node with the populated `slot` holding `value` instead.
    fn override_at(&self, slot: usize, value: Slot<K, V>) -> Self {
        let position = self.bitmap.density_below(slot);
        let mut slots = self.slots.to_vec();
        slots[position] = value;
        Self::from_parts(self.bitmap, slots)
    }

    /// Returns a node without the populated `slot`.
    fn delete_at(&self, slot: usize) -> Self {
        let position = self.bitmap.density_below(slot);
        let mut slots = Vec::with_capacity(self.slots.len() - 1);
        slots.extend_from_slice(&self.slots[..position]);
        slots.extend_from_slice(&self.slots[position + 1..]);
        Self::from_parts(self.bitmap.evict(slot), slots)
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    fn get<'a, Q, E>(&'a self, key: &Q, hash: u32, equivalence: &E) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
    {
        let mut node = self;
        let mut level = 1;
        loop {
            let slot = Bitmap32::level_index(hash, level);
            if !node.bitmap.populated_at(slot) {
                return None;
            }
            match node.slot_at(slot) {
                Slot::Entry(entry) => {
                    return equivalence
                        .equivalent(key, entry.key.borrow())
                        .then_some(&entry.value);
                }
                Slot::Node(child) => {
                    node = &**child;
                    level += 1;
                }
                Slot::Collision(bucket) => return bucket.lookup(key, hash, equivalence),
            }
        }
    }

    fn put<E>(&self, entry: ReferenceCounter<Entry<K, V>>, level: usize, equivalence: &E) -> Self
    where
        E: EquivalenceRelation<K>,
    {
        let slot = Bitmap32::level_index(entry.hash, level);
        if !self.bitmap.populated_at(slot) {
            return self.insert_at(slot, Slot::Entry(entry));
        }

        let replacement = match self.slot_at(slot) {
            Slot::Entry(existing) if equivalence.equivalent(&existing.key, &entry.key) => {
                Slot::Entry(entry)
            }
            Slot::Entry(existing) => {
                Self::split(ReferenceCounter::clone(existing), entry, level, equivalence)
            }
            Slot::Node(child) => {
                Slot::Node(ReferenceCounter::new(child.put(entry, level + 1, equivalence)))
            }
            Slot::Collision(bucket) => {
                debug_assert_eq!(bucket.hash(), entry.hash);
                Slot::Collision(ReferenceCounter::new(bucket.insert(entry, equivalence)))
            }
        };
        self.override_at(slot, replacement)
    }

    /// Builds the slot value holding two entries that met in one slot.
    fn split<E>(
        existing: ReferenceCounter<Entry<K, V>>,
        incoming: ReferenceCounter<Entry<K, V>>,
        level: usize,
        equivalence: &E,
    ) -> Slot<K, V>
    where
        E: EquivalenceRelation<K>,
    {
        let next_level = level + 1;
        if next_level == COLLISION_LEVEL {
            Slot::Collision(ReferenceCounter::new(CollisionBucket::pair(existing, incoming)))
        } else {
            let child = Self::empty()
                .put(existing, next_level, equivalence)
                .put(incoming, next_level, equivalence);
            Slot::Node(ReferenceCounter::new(child))
        }
    }

    /// Returns the node without `key`, or `None` when `key` is absent.
    ///
    /// A child node emptied by the removal stays installed; it answers every
    /// lookup with `None` and contributes nothing to the size.
    fn remove<Q, E>(&self, key: &Q, hash: u32, level: usize, equivalence: &E) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
    {
        let slot = Bitmap32::level_index(hash, level);
        if !self.bitmap.populated_at(slot) {
            return None;
        }

        match self.slot_at(slot) {
            Slot::Entry(entry) => equivalence
                .equivalent(key, entry.key.borrow())
                .then(|| self.delete_at(slot)),
            Slot::Node(child) => {
                let reduced = child.remove(key, hash, level + 1, equivalence)?;
                Some(self.override_at(slot, Slot::Node(ReferenceCounter::new(reduced))))
            }
            Slot::Collision(bucket) => {
                let reduced = bucket.remove(key, hash, equivalence)?;
                Some(if reduced.is_empty() {
                    self.delete_at(slot)
                } else {
                    self.override_at(slot, Slot::Collision(ReferenceCounter::new(reduced)))
                })
            }
        }
    }

    fn size(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Entry(_) => 1,
                Slot::Node(child) => child.size(),
                Slot::Collision(bucket) => bucket.len(),
            })
            .sum()
    }
}

// =============================================================================
// Hamt Definition
// =============================================================================

/// A persistent (immutable) hash map based on a hash array mapped trie.
///
/// `E` decides which keys are the same and `H` hashes them; the pair must
/// agree (equivalent keys hash identically) or lookups silently miss.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `new`      | O(1)       |
/// | `get`      | O(log32 N) |
/// | `put`      | O(log32 N) |
/// | `remove`   | O(log32 N) |
/// | `contains` | O(log32 N) |
/// | `size`     | O(N)       |
///
/// # Examples
///
/// ```rust
/// use shoki::persistent::Hamt;
///
/// let case_insensitive = Hamt::empty(
///     |left: &String, right: &String| left.eq_ignore_ascii_case(right),
///     |key: &String| key.to_ascii_lowercase().len() as u32,
/// );
/// let map = case_insensitive.put("Key".to_string(), 1);
/// assert_eq!(map.get(&"KEY".to_string()), Some(&1));
/// ```
pub struct Hamt<K, V, E = ObjectEquals, H = ObjectHashCode> {
    root: ReferenceCounter<Node<K, V>>,
    equivalence: E,
    hashing: H,
}

impl<K, V> Hamt<K, V> {
    /// Creates an empty trie using the keys' own `Eq` and `Hash`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let map: Hamt<String, i32> = Hamt::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::empty(ObjectEquals, ObjectHashCode)
    }
}

impl<K, V, E, H> Hamt<K, V, E, H> {
    /// Creates an empty trie governed by the given strategies.
    #[must_use]
    pub fn empty(equivalence: E, hashing: H) -> Self {
        Self {
            root: ReferenceCounter::new(Node::empty()),
            equivalence,
            hashing,
        }
    }

    /// Counts the entries by walking the whole trie.
    ///
    /// Sizes are never cached, so every call costs O(N).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let map = Hamt::new().put(1, "a").put(2, "b").put(1, "c");
    /// assert_eq!(map.size(), 2);
    /// ```
    #[must_use]
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Returns `true` if the trie holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns `true` if both versions share the same root node.
    ///
    /// Versions that share their root are indistinguishable; a `remove` of
    /// an absent key returns such a version.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.root, &other.root)
    }

    /// Iterates over all entries in unspecified order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let map = Hamt::new().put("a", 1).put("b", 2);
    /// let total: i32 = map.iter().map(|(_, value)| value).sum();
    /// assert_eq!(total, 3);
    /// ```
    #[must_use]
    pub fn iter(&self) -> HamtIterator<'_, K, V> {
        let mut frames = SmallVec::new();
        frames.push(self.root.slots.iter());
        HamtIterator {
            frames,
            bucket: None,
        }
    }

    /// Iterates over all keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over all values in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns a version built by `node` with the same strategies.
    fn with_root(&self, node: Node<K, V>) -> Self
    where
        E: Clone,
        H: Clone,
    {
        Self {
            root: ReferenceCounter::new(node),
            equivalence: self.equivalence.clone(),
            hashing: self.hashing.clone(),
        }
    }
}

impl<K, V, E, H> Hamt<K, V, E, H>
where
    E: Clone,
    H: Clone,
{
    /// Returns the value stored under `key`.
    ///
    /// The key may be any borrowed form of the key type, provided both
    /// strategies accept that form and agree with their answers for `K`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let map = Hamt::new().put("hello".to_string(), 42);
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
        H: HashingAlgorithm<Q>,
    {
        let hash = self.hashing.hash(key);
        self.root.get(key, hash, &self.equivalence)
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
        H: HashingAlgorithm<Q>,
    {
        self.get(key).is_some()
    }

    /// Returns a version with `value` stored under `key`.
    ///
    /// An entry with an equivalent key is replaced; the receiver is left
    /// unchanged either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let first = Hamt::new().put("key", 1);
    /// let second = first.put("key", 2);
    ///
    /// assert_eq!(first.get(&"key"), Some(&1));
    /// assert_eq!(second.get(&"key"), Some(&2));
    /// ```
    #[must_use]
    pub fn put(&self, key: K, value: V) -> Self
    where
        E: EquivalenceRelation<K>,
        H: HashingAlgorithm<K>,
    {
        let hash = self.hashing.hash(&key);
        let entry = ReferenceCounter::new(Entry { hash, key, value });
        self.with_root(self.root.put(entry, 1, &self.equivalence))
    }

    /// Returns a version without `key`.
    ///
    /// Removing an absent key allocates nothing and returns a version that
    /// shares the receiver's root (see [`Hamt::ptr_eq`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::Hamt;
    ///
    /// let map = Hamt::new().put("a", 1).put("b", 2);
    /// let removed = map.remove(&"a");
    ///
    /// assert_eq!(map.size(), 2);
    /// assert_eq!(removed.get(&"a"), None);
    /// assert!(removed.remove(&"a").ptr_eq(&removed));
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: EquivalenceRelation<Q>,
        H: HashingAlgorithm<Q>,
    {
        let hash = self.hashing.hash(key);
        self.root
            .remove(key, hash, 1, &self.equivalence)
            .map_or_else(|| self.clone(), |root| self.with_root(root))
    }
}

impl<K, V> Hamt<K, V>
where
    K: Clone + std::hash::Hash + Eq,
    V: Clone,
{
    /// Builds a trie holding every entry of `map`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use shoki::persistent::Hamt;
    ///
    /// let source = HashMap::from([("a", 1), ("b", 2)]);
    /// let map = Hamt::from_map(&source);
    /// assert_eq!(map.get(&"b"), Some(&2));
    /// ```
    #[must_use]
    pub fn from_map<S>(map: &HashMap<K, V, S>) -> Self {
        map.iter()
            .fold(Self::new(), |trie, (key, value)| trie.put(key.clone(), value.clone()))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the entries of a [`Hamt`].
///
/// Holds one slot iterator per trie level on the current path plus the
/// bucket being drained, if any.
pub struct HamtIterator<'a, K, V> {
    frames: SmallVec<[std::slice::Iter<'a, Slot<K, V>>; COLLISION_LEVEL]>,
    bucket: Option<ImmutableStackIterator<'a, ReferenceCounter<Entry<K, V>>>>,
}

impl<'a, K, V> Iterator for HamtIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(bucket) = &mut self.bucket {
                if let Some(entry) = bucket.next() {
                    return Some((&entry.key, &entry.value));
                }
                self.bucket = None;
            }

            let next = self.frames.last_mut()?.next();
            match next {
                None => {
                    self.frames.pop();
                }
                Some(Slot::Entry(entry)) => return Some((&entry.key, &entry.value)),
                Some(Slot::Node(child)) => self.frames.push(child.slots.iter()),
                Some(Slot::Collision(bucket)) => self.bucket = Some(bucket.entries()),
            }
        }
    }
}

impl<'a, K, V, E, H> IntoIterator for &'a Hamt<K, V, E, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = HamtIterator<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, E: Clone, H: Clone> Clone for Hamt<K, V, E, H> {
    fn clone(&self) -> Self {
        Self {
            root: ReferenceCounter::clone(&self.root),
            equivalence: self.equivalence.clone(),
            hashing: self.hashing.clone(),
        }
    }
}

impl<K, V> Default for Hamt<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::hash::Hash + Eq, V> FromIterator<(K, V)> for Hamt<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |trie, (key, value)| trie.put(key, value))
    }
}

/// Two tries are equal when they hold the same keys (by the receiver's
/// equivalence) mapped to equal values.
impl<K, V, E, H> PartialEq for Hamt<K, V, E, H>
where
    V: PartialEq,
    E: EquivalenceRelation<K> + Clone,
    H: HashingAlgorithm<K> + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.size() == other.size()
                && self
                    .iter()
                    .all(|(key, value)| other.get(key) == Some(value)))
    }
}

impl<K, V, E, H> Eq for Hamt<K, V, E, H>
where
    V: Eq,
    E: EquivalenceRelation<K> + Clone,
    H: HashingAlgorithm<K> + Clone,
{
}

impl<K: fmt::Debug, V: fmt::Debug, E, H> fmt::Debug for Hamt<K, V, E, H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, E, H> Sizable for Hamt<K, V, E, H> {
    /// Always known, always recomputed.
    fn size_info(&self) -> SizeInfo {
        SizeInfo::known(self.size())
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<K, V, E, H> TypeConstructor for Hamt<K, V, E, H> {
    type Inner = V;
    type WithType<B> = Hamt<K, B, E, H>;
}

impl<K, V: Clone, E, H> Foldable for Hamt<K, V, E, H> {
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, V) -> B,
    {
        self.values().cloned().fold(init, function)
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(V, B) -> B,
    {
        // No element order exists, so folding right only flips the arguments.
        self.values()
            .cloned()
            .fold(init, |accumulator, value| function(value, accumulator))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    #[inline]
    fn length(&self) -> usize {
        self.size()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, E, H> serde::Serialize for Hamt<K, V, E, H>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(feature = "serde")]
struct HamtVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for HamtVisitor<K, V>
where
    K: serde::Deserialize<'de> + std::hash::Hash + Eq,
    V: serde::Deserialize<'de>,
{
    type Value = Hamt<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut trie = Hamt::new();
        while let Some((key, value)) = access.next_entry()? {
            trie = trie.put(key, value);
        }
        Ok(trie)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Hamt<K, V>
where
    K: serde::Deserialize<'de> + std::hash::Hash + Eq,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(HamtVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Hamt<String, i32>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Hamt<String, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type IdentityHash = fn(&u32) -> u32;

    fn identity(key: &u32) -> u32 {
        *key
    }

    /// Keys hash to themselves, so tests choose slots bit by bit.
    fn identity_trie() -> Hamt<u32, &'static str, ObjectEquals, IdentityHash> {
        Hamt::empty(ObjectEquals, identity as IdentityHash)
    }

    fn entry_slot(key: u32, value: &'static str) -> Slot<u32, &'static str> {
        Slot::Entry(ReferenceCounter::new(Entry {
            hash: key,
            key,
            value,
        }))
    }

    fn root_keys<V>(node: &Node<u32, V>) -> Vec<u32> {
        node.slots
            .iter()
            .map(|slot| match slot {
                Slot::Entry(entry) => entry.key,
                _ => panic!("expected only entries at this level"),
            })
            .collect()
    }

    /// Levels of all nodes (level 1 is the root) holding a collision bucket.
    fn collision_levels<K, V>(node: &Node<K, V>, level: usize) -> Vec<usize> {
        node.slots
            .iter()
            .flat_map(|slot| match slot {
                Slot::Entry(_) => Vec::new(),
                Slot::Node(child) => collision_levels(&**child, level + 1),
                Slot::Collision(_) => vec![level],
            })
            .collect()
    }

    fn depth<K, V>(node: &Node<K, V>) -> usize {
        1 + node
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Node(child) => depth(&**child),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // Array surgery
    // =========================================================================

    fn node_with(keys: &[u32]) -> Node<u32, &'static str> {
        keys.iter()
            .fold(Node::empty(), |node, &key| node.insert_at(key as usize, entry_slot(key, "v")))
    }

    #[rstest]
    #[case(&[], 9, vec![9])]
    #[case(&[9], 0, vec![0, 9])]
    #[case(&[9], 31, vec![9, 31])]
    #[case(&[0, 31], 9, vec![0, 9, 31])]
    #[case(&[4, 9], 2, vec![2, 4, 9])]
    #[case(&[4, 9], 12, vec![4, 9, 12])]
    fn test_insert_at_keeps_slot_order(
        #[case] existing: &[u32],
        #[case] slot: u32,
        #[case] expected: Vec<u32>,
    ) {
        let node = node_with(existing);
        let inserted = node.insert_at(slot as usize, entry_slot(slot, "new"));
        assert_eq!(root_keys(&inserted), expected);
        assert_eq!(inserted.bitmap.population_count(), expected.len());
        assert_eq!(root_keys(&node), existing.to_vec());
    }

    #[rstest]
    #[case(&[9], 9, 0)]
    #[case(&[0, 9, 31], 0, 0)]
    #[case(&[0, 9, 31], 9, 1)]
    #[case(&[0, 9, 31], 31, 2)]
    fn test_override_at_replaces_in_place(
        #[case] existing: &[u32],
        #[case] slot: u32,
        #[case] position: usize,
    ) {
        let node = node_with(existing);
        let overridden = node.override_at(slot as usize, entry_slot(slot, "new"));
        assert_eq!(root_keys(&overridden), existing.to_vec());
        match &overridden.slots[position] {
            Slot::Entry(entry) => assert_eq!(entry.value, "new"),
            _ => panic!("expected an entry"),
        }
        match &node.slots[position] {
            Slot::Entry(entry) => assert_eq!(entry.value, "v"),
            _ => panic!("expected an entry"),
        }
    }

    #[rstest]
    #[case(&[9], 9, vec![])]
    #[case(&[0, 9, 31], 0, vec![9, 31])]
    #[case(&[0, 9, 31], 9, vec![0, 31])]
    #[case(&[0, 9, 31], 31, vec![0, 9])]
    #[case(&[0, 31], 31, vec![0])]
    fn test_delete_at_closes_gap(
        #[case] existing: &[u32],
        #[case] slot: u32,
        #[case] expected: Vec<u32>,
    ) {
        let node = node_with(existing);
        let deleted = node.delete_at(slot as usize);
        assert_eq!(root_keys(&deleted), expected);
        assert!(!deleted.bitmap.populated_at(slot as usize));
        assert_eq!(root_keys(&node), existing.to_vec());
    }

    #[rstest]
    fn test_untouched_slots_are_shared() {
        let node = node_with(&[1, 2, 3]);
        let overridden = node.override_at(2, entry_slot(2, "new"));
        for position in [0, 2] {
            match (&node.slots[position], &overridden.slots[position]) {
                (Slot::Entry(before), Slot::Entry(after)) => {
                    assert!(ReferenceCounter::ptr_eq(before, after));
                }
                _ => panic!("expected entries"),
            }
        }
    }

    // =========================================================================
    // Bitmap edge positions through the public API
    // =========================================================================

    #[rstest]
    #[case(0)]
    #[case(31)]
    #[case(16)]
    fn test_put_into_single_slot_node(#[case] slot: u32) {
        let single = identity_trie().put(7, "seven");
        let trie = single.put(slot, "new");
        assert_eq!(trie.get(&7), Some(&"seven"));
        assert_eq!(trie.get(&slot), Some(&"new"));
        assert_eq!(trie.size(), 2);

        let mut expected = vec![7, slot];
        expected.sort_unstable();
        assert_eq!(root_keys(&*trie.root), expected);
    }

    // =========================================================================
    // Splits and collisions
    // =========================================================================

    #[rstest]
    fn test_split_creates_child_node() {
        // Both keys select slot 1 at level 1 and differ at level 2.
        let trie = identity_trie().put(1, "a").put(1 | (2 << 5), "b");
        assert_eq!(trie.root.slots.len(), 1);
        assert!(matches!(trie.root.slots[0], Slot::Node(_)));
        assert_eq!(depth(&*trie.root), 2);
        assert_eq!(trie.get(&1), Some(&"a"));
        assert_eq!(trie.get(&(1 | (2 << 5))), Some(&"b"));
    }

    #[rstest]
    fn test_identical_hashes_form_bucket_at_last_node_level() {
        let constant = Hamt::empty(ObjectEquals, |_: &&str| 0x1234_5678_u32);
        let trie = constant.put("left", 1).put("right", 2);

        assert_eq!(depth(&*trie.root), COLLISION_LEVEL - 1);
        assert_eq!(collision_levels(&*trie.root, 1), vec![COLLISION_LEVEL - 1]);
        assert_eq!(trie.get(&"left"), Some(&1));
        assert_eq!(trie.get(&"right"), Some(&2));
        assert_eq!(trie.size(), 2);
    }

    #[rstest]
    fn test_hashes_differing_only_in_top_slice_do_not_collide() {
        let low_bits = 0x3FFF_FFFF_u32;
        let trie = identity_trie().put(low_bits, "low").put(low_bits | 0xC000_0000, "high");

        assert_eq!(depth(&*trie.root), COLLISION_LEVEL - 1);
        assert!(collision_levels(&*trie.root, 1).is_empty());
        assert_eq!(trie.get(&low_bits), Some(&"low"));
        assert_eq!(trie.get(&(low_bits | 0xC000_0000)), Some(&"high"));
    }

    #[rstest]
    fn test_removing_from_bucket_down_to_nothing_deletes_slot() {
        let constant = Hamt::empty(ObjectEquals, |_: &u8| 0_u32);
        let trie = constant.put(1, "a").put(2, "b");
        let emptied = trie.remove(&1).remove(&2);

        assert!(emptied.is_empty());
        assert_eq!(emptied.size(), 0);
        assert!(collision_levels(&*emptied.root, 1).is_empty());
    }

    // =========================================================================
    // Removal
    // =========================================================================

    #[rstest]
    fn test_emptied_child_node_stays_installed() {
        let trie = identity_trie().put(1, "a").put(1 | (2 << 5), "b");
        let emptied = trie.remove(&1).remove(&(1 | (2 << 5)));

        assert_eq!(emptied.root.slots.len(), 1);
        assert!(matches!(emptied.root.slots[0], Slot::Node(_)));
        assert!(emptied.is_empty());
        assert_eq!(emptied.get(&1), None);

        let refilled = emptied.put(1, "again");
        assert_eq!(refilled.get(&1), Some(&"again"));
        assert_eq!(refilled.size(), 1);
    }

    #[rstest]
    fn test_remove_absent_key_shares_root() {
        let trie = identity_trie().put(1, "a").put(1 | (2 << 5), "b");
        assert!(trie.remove(&99).ptr_eq(&trie));
        assert!(trie.remove(&(1 | (3 << 5))).ptr_eq(&trie));
    }

    #[rstest]
    fn test_mismatching_entry_in_slot_means_absent() {
        let trie = identity_trie().put(1, "a");
        assert_eq!(trie.get(&(1 | (1 << 5))), None);
        assert!(trie.remove(&(1 | (1 << 5))).ptr_eq(&trie));
    }

    // =========================================================================
    // Container behaviour
    // =========================================================================

    #[rstest]
    fn test_iter_visits_entries_in_nodes_and_buckets() {
        let constant = Hamt::empty(ObjectEquals, |key: &u32| key % 3);
        let trie: Hamt<u32, u32, _, _> = (0..12).fold(constant, |trie, key| trie.put(key, key * 10));

        let mut keys: Vec<u32> = trie.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..12).collect::<Vec<_>>());
        assert_eq!(trie.values().sum::<u32>(), (0..12).map(|key| key * 10).sum());
    }

    #[rstest]
    fn test_size_info_is_known_traversal_count() {
        let trie = identity_trie().put(1, "a").put(2, "b");
        assert_eq!(trie.size_info(), SizeInfo::known(2));
    }

    #[rstest]
    fn test_fold_left_over_values() {
        let trie: Hamt<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(trie.fold_left(0, |sum, value| sum + value), 6);
    }

    #[rstest]
    fn test_debug_formats_as_map() {
        let trie = identity_trie().put(3, "three");
        assert_eq!(format!("{trie:?}"), r#"{3: "three"}"#);
    }
}
