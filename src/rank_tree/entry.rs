use core::fmt;
use core::mem;

use crate::allocator::NodeAllocator;
use crate::error::AllocError;
use crate::position::Position;
use crate::raw::{Handle, RawRankTree, Slot};

/// A view into a single position of a tree, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`crate::RankTree`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankTree;
/// use rank_tree::rank_tree::Entry;
///
/// let mut tree = RankTree::new();
///
/// match tree.entry(7u32) {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(tree[7], 1);
/// ```
///
/// [`entry`]: crate::RankTree::entry
pub enum Entry<'a, P: Position, V, A> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, P, V, A>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, P, V, A>),
}

impl<P: Position, V: fmt::Debug, A> fmt::Debug for Entry<'_, P, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// A view into a vacant position of a `RankTree`.
/// It is part of the [`Entry`] enum.
///
/// The descent made by [`entry`](crate::RankTree::entry) is kept, so inserting
/// through the entry links the node without searching again.
pub struct VacantEntry<'a, P: Position, V, A> {
    pub(crate) position: P,
    pub(crate) slot: Slot<P::Delta>,
    pub(crate) tree: &'a mut RawRankTree<P, V, A>,
}

impl<P: Position, V, A> fmt::Debug for VacantEntry<'_, P, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("position", &self.position).finish()
    }
}

/// A view into an occupied position of a `RankTree`.
/// It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, P: Position, V, A> {
    pub(crate) position: P,
    pub(crate) handle: Handle,
    pub(crate) tree: &'a mut RawRankTree<P, V, A>,
}

impl<P: Position, V: fmt::Debug, A> fmt::Debug for OccupiedEntry<'_, P, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("position", &self.position)
            .field("value", self.get())
            .finish()
    }
}

impl<'a, P: Position, V, A: NodeAllocator> Entry<'a, P, V, A> {
    /// Ensures a value is in the entry by inserting `default` if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Panics
    ///
    /// Panics if the entry is vacant and the allocation strategy refuses a new node.
    ///
    /// # Complexity
    ///
    /// O(log n) if vacant (rebalancing), O(1) if occupied.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of `default` if empty,
    /// and returns a mutable reference to the value in the entry.
    ///
    /// # Panics
    ///
    /// Panics if the entry is vacant and the allocation strategy refuses a new node.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Like [`or_insert_with`](Self::or_insert_with), but `default` receives the position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree: RankTree<u32, u64> = RankTree::new();
    /// tree.entry(12).or_insert_with_position(|position| u64::from(position) * 2);
    /// assert_eq!(tree[12], 24);
    /// ```
    pub fn or_insert_with_position<F: FnOnce(P) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(v.position);
                v.insert(value)
            }
        }
    }

    /// Returns this entry's position.
    pub fn position(&self) -> P {
        match self {
            Entry::Occupied(o) => o.position,
            Entry::Vacant(v) => v.position,
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree: RankTree<i8, u32> = RankTree::new();
    /// tree.entry(-1).and_modify(|v| *v += 1).or_insert(42);
    /// assert_eq!(tree[-1], 42);
    /// tree.entry(-1).and_modify(|v| *v += 1).or_insert(42);
    /// assert_eq!(tree[-1], 43);
    /// ```
    #[must_use]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(o) = &mut self {
            f(o.get_mut());
        }
        self
    }
}

impl<'a, P: Position, V: Default, A: NodeAllocator> Entry<'a, P, V, A> {
    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<'a, P: Position, V, A: NodeAllocator> VacantEntry<'a, P, V, A> {
    /// Returns the position this entry would be inserted at.
    pub fn position(&self) -> P {
        self.position
    }

    /// Inserts `value` at the entry's position and returns a mutable reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a new node. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(self, value: V) -> &'a mut V {
        self.tree.reserve();
        let handle = self.tree.link(self.slot, value);
        self.tree.value_mut(handle)
    }

    /// Inserts `value` at the entry's position, or gives the value back if the
    /// allocation strategy refuses a new node.
    ///
    /// # Errors
    ///
    /// Returns the refusal together with `value`. The tree is unchanged.
    pub fn try_insert(self, value: V) -> Result<&'a mut V, (AllocError, V)> {
        if let Err(err) = self.tree.try_reserve() {
            return Err((err, value));
        }
        let handle = self.tree.link(self.slot, value);
        Ok(self.tree.value_mut(handle))
    }
}

impl<'a, P: Position, V, A> OccupiedEntry<'a, P, V, A> {
    /// Returns the position of the entry.
    pub fn position(&self) -> P {
        self.position
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.tree.value(self.handle)
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// For a reference that outlives the entry, see [`into_mut`](Self::into_mut).
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.value_mut(self.handle)
    }

    /// Converts the entry into a mutable reference to its value.
    pub fn into_mut(self) -> &'a mut V {
        self.tree.value_mut(self.handle)
    }

    /// Sets the value of the entry, returning the old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the tree, returning its value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(self) -> V {
        self.tree.remove_node(self.handle)
    }

    /// Removes the entry from the tree, returning its position and value.
    pub fn remove_entry(self) -> (P, V) {
        let position = self.position;
        (position, self.remove())
    }
}
