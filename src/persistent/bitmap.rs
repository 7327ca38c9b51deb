//! 32-slot population bitmap used by every trie node.
//!
//! A node conceptually has 32 branches but only stores the populated ones,
//! densely and in ascending slot order. [`Bitmap32`] records which slots are
//! populated and translates a sparse slot (0..31) into the dense position of
//! its value via a population count of the bits below it.

/// Number of hash bits consumed per trie level.
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Number of slots per node (2^5).
pub(crate) const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Mask selecting one level's slice of a hash.
const LEVEL_MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

/// An immutable bitset over the slots 0..31 of a node.
///
/// Every operation returns a new value; the receiver is never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Bitmap32(u32);

impl Bitmap32 {
    /// The bitmap with no populated slot.
    pub(crate) const EMPTY: Self = Self(0);

    /// Returns `true` if `slot` is populated.
    #[inline]
    pub(crate) const fn populated_at(self, slot: usize) -> bool {
        self.0 & Self::bit(slot) != 0
    }

    /// Returns a bitmap with `slot` populated.
    #[inline]
    #[must_use]
    pub(crate) const fn populate(self, slot: usize) -> Self {
        Self(self.0 | Self::bit(slot))
    }

    /// Returns a bitmap with `slot` cleared.
    #[inline]
    #[must_use]
    pub(crate) const fn evict(self, slot: usize) -> Self {
        Self(self.0 & !Self::bit(slot))
    }

    /// Counts the populated slots strictly below `slot`.
    ///
    /// This is the dense position of `slot`'s value in its node.
    #[inline]
    pub(crate) const fn density_below(self, slot: usize) -> usize {
        (self.0 & (Self::bit(slot) - 1)).count_ones() as usize
    }

    /// Counts all populated slots.
    #[inline]
    pub(crate) const fn population_count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Extracts the slot `hash` selects at `level` (levels start at 1).
    ///
    /// Level `l` reads bits `5(l-1)..5l`; slices past the top of the hash
    /// read as zero bits.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn level_index(hash: u32, level: usize) -> usize {
        let shift = (level - 1) * BITS_PER_LEVEL;
        if shift >= u32::BITS as usize {
            0
        } else {
            (((hash as u64) >> shift) & LEVEL_MASK) as usize
        }
    }

    #[inline]
    const fn bit(slot: usize) -> u32 {
        debug_assert!(slot < BRANCHING_FACTOR);
        1u32 << slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_has_no_population() {
        assert_eq!(Bitmap32::EMPTY.population_count(), 0);
        assert!((0..BRANCHING_FACTOR).all(|slot| !Bitmap32::EMPTY.populated_at(slot)));
    }

    #[rstest]
    #[case(0)]
    #[case(15)]
    #[case(31)]
    fn test_populate_then_evict(#[case] slot: usize) {
        let populated = Bitmap32::EMPTY.populate(slot);
        assert!(populated.populated_at(slot));
        assert_eq!(populated.population_count(), 1);

        let evicted = populated.evict(slot);
        assert!(!evicted.populated_at(slot));
        assert_eq!(evicted, Bitmap32::EMPTY);
    }

    #[rstest]
    fn test_populate_and_evict_are_idempotent() {
        let once = Bitmap32::EMPTY.populate(7);
        assert_eq!(once.populate(7), once);
        assert_eq!(Bitmap32::EMPTY.evict(7), Bitmap32::EMPTY);
        assert_eq!(once.evict(7).evict(7), Bitmap32::EMPTY);
    }

    #[rstest]
    fn test_populate_leaves_receiver_untouched() {
        let original = Bitmap32::EMPTY.populate(3);
        let _ = original.populate(4);
        assert!(!original.populated_at(4));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(5, 1)]
    #[case(6, 2)]
    #[case(31, 2)]
    fn test_density_below(#[case] slot: usize, #[case] expected: usize) {
        let bitmap = Bitmap32::EMPTY.populate(0).populate(5);
        assert_eq!(bitmap.density_below(slot), expected);
    }

    #[rstest]
    fn test_density_below_full_bitmap() {
        let full = (0..BRANCHING_FACTOR).fold(Bitmap32::EMPTY, Bitmap32::populate);
        assert_eq!(full.population_count(), BRANCHING_FACTOR);
        for slot in 0..BRANCHING_FACTOR {
            assert_eq!(full.density_below(slot), slot);
        }
    }

    #[rstest]
    #[case(0b11111, 1, 31)]
    #[case(0b00001_00000, 1, 0)]
    #[case(0b00001_00000, 2, 1)]
    #[case(0b10101 << 25, 6, 21)]
    #[case(0xC000_0000, 7, 3)]
    #[case(0xFFFF_FFFF, 7, 3)]
    #[case(0xFFFF_FFFF, 8, 0)]
    fn test_level_index(#[case] hash: u32, #[case] level: usize, #[case] expected: usize) {
        assert_eq!(Bitmap32::level_index(hash, level), expected);
    }

    #[rstest]
    fn test_level_index_is_pure() {
        let hash = 0xDEAD_BEEF;
        let first: Vec<usize> = (1..=7).map(|level| Bitmap32::level_index(hash, level)).collect();
        let second: Vec<usize> = (1..=7).map(|level| Bitmap32::level_index(hash, level)).collect();
        assert_eq!(first, second);
    }
}
