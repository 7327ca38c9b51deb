//! Pluggable key hashing.
//!
//! A [`HashingAlgorithm`] turns a key into the 32-bit hash the trie slices
//! into per-level indices. [`ObjectHashCode`] is the default: it feeds the
//! key's [`Hash`] implementation to the hasher selected by the crate
//! features.
//!
//! # Feature Flags
//!
//! | Feature  | Hasher                                   |
//! |----------|------------------------------------------|
//! | (none)   | `std::hash::DefaultHasher`               |
//! | `fxhash` | `rustc_hash::FxHasher`                   |
//! | `ahash`  | `ahash::AHasher` (when `fxhash` is off)  |
//!
//! All three are deterministic within a process, which is all the trie needs.

use std::hash::{Hash, Hasher};

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyHasher = ahash::AHasher;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyHasher = std::hash::DefaultHasher;

/// Maps a key to the hash the trie is indexed by.
///
/// Keys that the paired [`EquivalenceRelation`](super::EquivalenceRelation)
/// considers equivalent must produce the same hash.
pub trait HashingAlgorithm<K: ?Sized> {
    /// Computes the hash of `key`.
    fn hash(&self, key: &K) -> u32;
}

impl<K, F> HashingAlgorithm<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u32,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        self(key)
    }
}

/// Hashing through the key's own [`Hash`] implementation.
///
/// # Examples
///
/// ```rust
/// use shoki::typeclass::{HashingAlgorithm, ObjectHashCode};
///
/// assert_eq!(ObjectHashCode.hash("key"), ObjectHashCode.hash("key"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectHashCode;

impl<K: Hash + ?Sized> HashingAlgorithm<K> for ObjectHashCode {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        let mut hasher = KeyHasher::default();
        Hash::hash(key, &mut hasher);
        fold_to_u32(hasher.finish())
    }
}

/// Folds a 64-bit hash into 32 bits, keeping entropy from both halves.
#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn fold_to_u32(hash: u64) -> u32 {
    (hash as u32) ^ ((hash >> 32) as u32)
}
