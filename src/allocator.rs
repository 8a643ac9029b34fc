//! Allocation strategies for the node arena.
//!
//! Every container owns an arena of nodes. The arena asks its [`NodeAllocator`]
//! before it grows, so the strategy decides how (and whether) node storage expands.
//! Freed nodes are recycled through the arena's free list without consulting the
//! strategy.

use alloc::vec::Vec;

use crate::error::AllocError;

/// An injectable strategy that controls how a container's node arena grows.
///
/// # Examples
///
/// ```
/// use rank_tree::{Bounded, IndexedSeq};
///
/// let mut seq = IndexedSeq::new_in(Bounded::new(2));
/// seq.try_push_back(1).unwrap();
/// seq.try_push_back(2).unwrap();
/// assert!(seq.try_push_back(3).is_err());
/// assert_eq!(seq.len(), 2);
/// ```
pub trait NodeAllocator {
    /// Makes room for at least `additional` more elements in `slots`.
    ///
    /// On error `slots` must be left untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the strategy refuses to grow the arena.
    fn grow<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<(), AllocError>;

    /// Returns `true` if nodes owned under `self` may be handed over to a container
    /// using `other` without going through `other`'s growth policy.
    ///
    /// Containers whose strategies are compatible swap in O(1); otherwise the swap
    /// moves every node into the other arena.
    fn is_compatible(&self, other: &Self) -> bool;
}

/// The default strategy: grow through the global allocator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Global;

impl NodeAllocator for Global {
    fn grow<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
        slots.try_reserve(additional).map_err(|_| AllocError::OutOfMemory)
    }

    fn is_compatible(&self, _other: &Self) -> bool {
        true
    }
}

/// A strategy that never lets the arena hold more than `limit` nodes.
///
/// Useful to bound the memory of a container, and to exercise the transactional
/// guarantees of insertions when allocation fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounded {
    limit: usize,
}

impl Bounded {
    /// Creates a strategy that caps the arena at `limit` nodes.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Returns the node limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

impl NodeAllocator for Bounded {
    fn grow<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
        let len = slots.len();
        let wanted = len.saturating_add(additional);
        if wanted > self.limit {
            return Err(AllocError::LimitExceeded { limit: self.limit });
        }
        // Amortized doubling, clamped so the reservation never passes the limit.
        let target = len.saturating_mul(2).max(wanted).min(self.limit);
        slots.try_reserve_exact(target - len).map_err(|_| AllocError::OutOfMemory)
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.limit == other.limit
    }
}
