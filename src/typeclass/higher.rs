//! Type constructor emulation through Generic Associated Types.
//!
//! Rust cannot abstract over a type constructor such as `Hamt<K, _>`
//! directly. [`TypeConstructor`] names the element type a container is
//! currently applied to and the same container applied to another element
//! type, which is enough for [`Foldable`](super::Foldable) to be written once
//! for every persistent collection in this crate.

/// A container viewed as a type constructor applied to [`Inner`](Self::Inner).
///
/// # Laws
///
/// `<F as TypeConstructor>::WithType<F::Inner>` is `F` itself.
///
/// # Examples
///
/// ```rust
/// use shoki::typeclass::TypeConstructor;
/// use shoki::persistent::ImmutableStack;
///
/// fn element_count<T: TypeConstructor<Inner = i32>>(_: &T) {}
///
/// element_count(&ImmutableStack::<i32>::new());
/// ```
pub trait TypeConstructor {
    /// The element type the constructor is applied to.
    type Inner;

    /// The same constructor applied to `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T> TypeConstructor for Vec<T> {
    type Inner = T;
    type WithType<B> = Vec<B>;
}
