//! Persistent (immutable) singly-linked stack.
//!
//! [`ImmutableStack`] is a cons-list: pushing with [`cons`](ImmutableStack::cons)
//! allocates one cell and shares the whole previous stack as its tail. The
//! trie uses it as the storage of collision buckets, where O(1) prepend and
//! free sharing between bucket versions are what matter.
//!
//! # Examples
//!
//! ```rust
//! use shoki::persistent::ImmutableStack;
//!
//! let stack = ImmutableStack::new().cons(3).cons(2).cons(1);
//! assert_eq!(stack.head(), Some(&1));
//!
//! // Structural sharing: the original stack is preserved
//! let pushed = stack.cons(0);
//! assert_eq!(stack.len(), 3);
//! assert_eq!(pushed.len(), 4);
//! ```
//!
//! # Structural Sharing
//!
//! ```text
//! stack:              1 -> 2 -> 3 -> nil
//! stack.cons(0): 0 -> [1 -> 2 -> 3 -> nil]  // shares [1, 2, 3] with stack
//! ```

use std::fmt;
use std::iter::FromIterator;

use super::ReferenceCounter;
use crate::typeclass::{Foldable, Sizable, SizeInfo, TypeConstructor};

/// One cell of the stack.
struct Cell<T> {
    element: T,
    next: Option<ReferenceCounter<Self>>,
}

/// A persistent (immutable) singly-linked stack.
///
/// # Time Complexity
///
/// | Operation | Complexity |
/// |-----------|------------|
/// | `new`     | O(1)       |
/// | `cons`    | O(1)       |
/// | `head`    | O(1)       |
/// | `tail`    | O(1)       |
/// | `len`     | O(1)       |
/// | `reverse` | O(n)       |
pub struct ImmutableStack<T> {
    head: Option<ReferenceCounter<Cell<T>>>,
    /// Cached so `len` and `size_info` never walk the cells.
    length: usize,
}

// Manual impl: cloning shares the cells and must not require `T: Clone`.
impl<T> Clone for ImmutableStack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            length: self.length,
        }
    }
}

impl<T> ImmutableStack<T> {
    /// Creates an empty stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::ImmutableStack;
    ///
    /// let stack: ImmutableStack<i32> = ImmutableStack::new();
    /// assert!(stack.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            length: 0,
        }
    }

    /// Pushes `element` on top, sharing the receiver as the tail.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    #[inline]
    #[must_use]
    pub fn cons(&self, element: T) -> Self {
        Self {
            head: Some(ReferenceCounter::new(Cell {
                element,
                next: self.head.clone(),
            })),
            length: self.length + 1,
        }
    }

    /// Returns the top element, if any.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        self.head.as_ref().map(|cell| &cell.element)
    }

    /// Returns the stack below the top element.
    ///
    /// The tail of an empty stack is empty.
    #[inline]
    #[must_use]
    pub fn tail(&self) -> Self {
        self.head.as_ref().map_or_else(Self::new, |cell| Self {
            head: cell.next.clone(),
            length: self.length - 1,
        })
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the stack has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Iterates from the top of the stack down.
    #[must_use]
    pub fn iter(&self) -> ImmutableStackIterator<'_, T> {
        ImmutableStackIterator {
            current: self.head.as_deref(),
            remaining: self.length,
        }
    }

    /// Returns `true` if both stacks share the same top cell, and therefore
    /// every cell below it.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> ImmutableStack<T> {
    /// Returns the stack with its elements in the opposite order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shoki::persistent::ImmutableStack;
    ///
    /// let stack = ImmutableStack::new().cons(3).cons(2).cons(1);
    /// let reversed = stack.reverse();
    /// assert_eq!(reversed.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.iter()
            .fold(Self::new(), |reversed, element| reversed.cons(element.clone()))
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to the elements of an [`ImmutableStack`].
pub struct ImmutableStackIterator<'a, T> {
    current: Option<&'a Cell<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for ImmutableStackIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|cell| {
            self.current = cell.next.as_deref();
            self.remaining -= 1;
            &cell.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ImmutableStackIterator<'_, T> {}

impl<'a, T> IntoIterator for &'a ImmutableStack<T> {
    type Item = &'a T;
    type IntoIter = ImmutableStackIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for ImmutableStack<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Collects so that the first element yielded ends up on top.
impl<T> FromIterator<T> for ImmutableStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut elements: Vec<T> = iter.into_iter().collect();
        let mut stack = Self::new();
        while let Some(element) = elements.pop() {
            stack = stack.cons(element);
        }
        stack
    }
}

impl<T: PartialEq> PartialEq for ImmutableStack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ImmutableStack<T> {}

impl<T: fmt::Debug> fmt::Debug for ImmutableStack<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for ImmutableStack<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

impl<T> Sizable for ImmutableStack<T> {
    #[inline]
    fn size_info(&self) -> SizeInfo {
        SizeInfo::known(self.length)
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for ImmutableStack<T> {
    type Inner = T;
    type WithType<B> = ImmutableStack<B>;
}

impl<T: Clone> Foldable for ImmutableStack<T> {
    fn fold_left<B, F>(self, init: B, function: F) -> B
    where
        F: FnMut(B, T) -> B,
    {
        self.iter().cloned().fold(init, function)
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> B,
    {
        self.reverse()
            .fold_left(init, |accumulator, element| function(element, accumulator))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

// =============================================================================
// Tests
// =============================================================================
