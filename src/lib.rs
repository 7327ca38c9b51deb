//! # shoki
//!
//! Persistent hash maps and sets for Rust, built on a hash array mapped
//! trie.
//!
//! ## Overview
//!
//! - **Persistent Data Structures**: [`Hamt`](persistent::Hamt),
//!   [`HashSet`](persistent::HashSet) and
//!   [`ImmutableStack`](persistent::ImmutableStack). Updates return new
//!   versions that share structure with the old ones.
//! - **Pluggable Strategies**: key equivalence and key hashing are values
//!   chosen per collection, not fixed by the key type.
//! - **Type Classes**: [`Sizable`](typeclass::Sizable) and
//!   [`Foldable`](typeclass::Foldable) across all collections.
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc`, making collections `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for maps and sets
//! - `fxhash`: hash keys with `rustc_hash::FxHasher`
//! - `ahash`: hash keys with `ahash::AHasher`
//! - `full`: `arc` and `serde`
//!
//! ## Example
//!
//! ```rust
//! use shoki::prelude::*;
//!
//! let map: Hamt<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
//! let without_a = map.remove(&"a");
//!
//! assert_eq!(map.size_info(), SizeInfo::known(2));
//! assert_eq!(without_a.get(&"b"), Some(&2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use shoki::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
    pub use crate::typeclass::*;
}

pub mod persistent;
pub mod typeclass;
