//! Uniform size reporting across collections.
//!
//! Some structures know their size cheaply, some can only compute it by a
//! traversal, and some (lazy or infinite ones) cannot report it at all.
//! [`SizeInfo`] lets callers ask every collection the same question and
//! learn which of these answers they got.

use std::fmt;

/// The answer to a size query.
///
/// # Examples
///
/// ```rust
/// use shoki::typeclass::SizeInfo;
///
/// assert_eq!(SizeInfo::known(3).size(), Some(3));
/// assert_eq!(SizeInfo::Unknown.size(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeInfo {
    /// The structure reported an exact element count.
    Known(usize),
    /// The structure cannot report its size.
    Unknown,
}

impl SizeInfo {
    /// Creates a known size.
    #[inline]
    #[must_use]
    pub const fn known(size: usize) -> Self {
        Self::Known(size)
    }

    /// Returns the size if it is known.
    #[inline]
    #[must_use]
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Known(size) => Some(size),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for [`SizeInfo::Known`].
    #[inline]
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for SizeInfo {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(size) => write!(formatter, "Known({size})"),
            Self::Unknown => write!(formatter, "Unknown"),
        }
    }
}

/// Capability of reporting a [`SizeInfo`].
pub trait Sizable {
    /// Reports the size of this structure.
    fn size_info(&self) -> SizeInfo;
}
