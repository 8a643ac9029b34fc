use super::RankTree;
use crate::allocator::{Global, NodeAllocator};
use crate::error::AllocError;
use crate::position::Position;
use crate::raw::RawRankTree;

impl<P: Position, V> RankTree<P, V> {
    /// Creates an empty tree with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree: RankTree<u32, u32> = RankTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<P: Position, V, A> RankTree<P, V, A> {
    /// Creates an empty tree with room for at least `capacity` entries, growing
    /// through `allocator` afterwards.
    ///
    /// The initial room is granted directly; the strategy governs later growth.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, allocator: A) -> Self {
        Self {
            raw: RawRankTree::with_capacity_in(capacity, allocator),
        }
    }

    /// Returns the number of entries the tree can hold without growing its arena.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

impl<P: Position, V, A: NodeAllocator> RankTree<P, V, A> {
    /// Reserves room for at least `additional` more entries.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the allocation strategy refuses.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Bounded, RankTree};
    ///
    /// let mut tree: RankTree<u8, (), Bounded> = RankTree::new_in(Bounded::new(4));
    /// assert!(tree.try_reserve(4).is_ok());
    /// assert!(tree.try_reserve(5).is_err());
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.raw.try_reserve_exact(additional)
    }
}
