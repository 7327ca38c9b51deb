//! Persistent (immutable) data structures.
//!
//! - [`Hamt`]: persistent hash map (hash array mapped trie)
//! - [`HashSet`]: persistent hash set (based on [`Hamt`])
//! - [`ImmutableStack`]: persistent singly-linked stack
//!
//! Every operation that would modify a structure returns a new version
//! instead. Versions share every part of the structure that the operation
//! did not touch, so keeping old versions around is cheap.
//!
//! # Examples
//!
//! ```rust
//! use shoki::persistent::Hamt;
//!
//! let map = Hamt::new()
//!     .put("one".to_string(), 1)
//!     .put("two".to_string(), 2);
//! assert_eq!(map.get("one"), Some(&1));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.remove("one");
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(updated.get("one"), None);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod bitmap;
mod collision;
mod hamt;
mod hashset;
mod stack;

pub use hamt::Hamt;
pub use hamt::HamtIterator;
pub use hashset::HashSet;
pub use hashset::HashSetIterator;
pub use stack::ImmutableStack;
pub use stack::ImmutableStackIterator;
