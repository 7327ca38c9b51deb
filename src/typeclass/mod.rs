//! Traits shared by the persistent collections.
//!
//! - [`EquivalenceRelation`]: which keys denote the same entry
//! - [`HashingAlgorithm`]: the 32-bit hash a key is indexed by
//! - [`Sizable`]: uniform size reporting through [`SizeInfo`]
//! - [`Foldable`]: folding a structure into a summary value
//!
//! ## Higher-Kinded Types Emulation
//!
//! Rust does not have native support for higher-kinded types (HKT).
//! [`TypeConstructor`] uses Generic Associated Types (GAT) to name the
//! element type of a container, which is what [`Foldable`] is written
//! against.
//!
//! # Examples
//!
//! ```rust
//! use shoki::typeclass::{EquivalenceRelation, HashingAlgorithm, ObjectEquals, ObjectHashCode};
//!
//! assert!(ObjectEquals.equivalent("key", "key"));
//! assert_eq!(ObjectHashCode.hash("key"), ObjectHashCode.hash("key"));
//! ```

mod equivalence;
mod foldable;
mod hashing;
mod higher;
mod sizable;

pub use equivalence::{EquivalenceRelation, ObjectEquals};
pub use foldable::Foldable;
pub use hashing::{HashingAlgorithm, ObjectHashCode};
pub use higher::TypeConstructor;
pub use sizable::{Sizable, SizeInfo};
