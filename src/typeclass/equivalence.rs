//! Pluggable key equivalence.
//!
//! Collections in this crate never assume that a key's own `Eq` is the
//! notion of identity to use. They are built with an [`EquivalenceRelation`]
//! value, so two collections over the same key type can disagree about which
//! keys are "the same" (case-sensitive versus case-insensitive strings, for
//! instance).
//!
//! # Examples
//!
//! ```rust
//! use shoki::typeclass::{EquivalenceRelation, ObjectEquals};
//!
//! assert!(ObjectEquals.equivalent(&1, &1));
//!
//! let case_insensitive = |left: &String, right: &String| left.eq_ignore_ascii_case(right);
//! assert!(case_insensitive.equivalent(&"Key".to_string(), &"KEY".to_string()));
//! ```

/// A binary predicate deciding whether two keys denote the same entry.
///
/// Implementations must be reflexive, symmetric and transitive, and must
/// agree with the [`HashingAlgorithm`](super::HashingAlgorithm) they are
/// paired with: equivalent keys have to hash identically. Neither property
/// is checked; breaking them makes lookups silently miss.
pub trait EquivalenceRelation<K: ?Sized> {
    /// Returns `true` if `left` and `right` are equivalent.
    fn equivalent(&self, left: &K, right: &K) -> bool;
}

impl<K, F> EquivalenceRelation<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equivalent(&self, left: &K, right: &K) -> bool {
        self(left, right)
    }
}

/// Equivalence through the key's own [`Eq`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ObjectEquals;

impl<K: Eq + ?Sized> EquivalenceRelation<K> for ObjectEquals {
    #[inline]
    fn equivalent(&self, left: &K, right: &K) -> bool {
        left == right
    }
}
