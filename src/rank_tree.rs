use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Index;

use crate::allocator::{Global, NodeAllocator};
use crate::error::{AllocError, InsertError, StructureError};
use crate::position::Position;
use crate::raw::{Arena, Handle, Node, RawRankTree, Search, Side, Walk};

mod bounds;
mod capacity;
mod entry;

pub use bounds::Range;
pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// An ordered map from positions to values whose positions can be shifted in bulk.
///
/// `RankTree` is a red/black tree in which no node stores its own position. Each
/// node stores the difference between its position and its parent's. Adding a
/// constant to every position on one side of a boundary therefore only touches
/// the nodes on one root-to-leaf path: see [`shift_from`] and [`shift_before`].
///
/// Point operations (`get`, `insert`, `remove`) are O(log n). The first and last
/// entries are cached, so [`first`] and [`last`] find their node in O(1).
///
/// The allocation strategy `A` decides whether the node arena may grow; see
/// [`NodeAllocator`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankTree;
///
/// let mut lines = RankTree::new();
/// lines.insert(10u32, "ten");
/// lines.insert(20, "twenty");
/// lines.insert(30, "thirty");
///
/// // Open a gap of five before line 20.
/// lines.shift_from(20, 5);
/// assert_eq!(lines.get(20), None);
/// assert_eq!(lines.get(25), Some(&"twenty"));
/// assert_eq!(lines.get(35), Some(&"thirty"));
///
/// // Close it again.
/// lines.shift_from(25, -5);
/// assert_eq!(lines.positions().collect::<Vec<_>>(), [10, 20, 30]);
/// ```
///
/// [`shift_from`]: RankTree::shift_from
/// [`shift_before`]: RankTree::shift_before
/// [`first`]: RankTree::first
/// [`last`]: RankTree::last
pub struct RankTree<P: Position, V, A = Global> {
    pub(crate) raw: RawRankTree<P, V, A>,
}

/// An iterator over the entries of a `RankTree`, in position order.
///
/// This `struct` is created by the [`iter`] method on [`RankTree`].
///
/// [`iter`]: RankTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, P: Position, V> {
    nodes: &'a Arena<Node<P::Delta>>,
    values: &'a Arena<V>,
    walk: Walk<P::Delta>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `RankTree`, in position order.
///
/// This `struct` is created by the [`iter_mut`] method on [`RankTree`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankTree;
///
/// let mut tree = RankTree::from([(1u8, 10), (2, 20)]);
/// for (_, value) in tree.iter_mut() {
///     *value += 1;
/// }
/// assert_eq!(tree.values().copied().collect::<Vec<_>>(), [11, 21]);
/// ```
///
/// [`iter_mut`]: RankTree::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, P: Position, V> {
    nodes: &'a Arena<Node<P::Delta>>,
    values: *mut Option<V>,
    walk: Walk<P::Delta>,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: IterMut hands out `&mut V` and reads node links, so it is Send when V is Send
// and the links can be shared.
unsafe impl<P: Position, V: Send> Send for IterMut<'_, P, V> where P::Delta: Sync {}
// SAFETY: A shared IterMut only exposes what a shared `&V` would.
unsafe impl<P: Position, V: Sync> Sync for IterMut<'_, P, V> where P::Delta: Sync {}

/// An owning iterator over the entries of a `RankTree`, in position order.
///
/// This `struct` is created by the [`into_iter`] method on [`RankTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<P: Position, V> {
    nodes: Arena<Node<P::Delta>>,
    values: Arena<V>,
    walk: Walk<P::Delta>,
    remaining: usize,
}

/// An iterator over the positions of a `RankTree`.
///
/// This `struct` is created by the [`positions`] method on [`RankTree`].
///
/// [`positions`]: RankTree::positions
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Positions<'a, P: Position, V> {
    inner: Iter<'a, P, V>,
}

/// An iterator over the values of a `RankTree`.
///
/// This `struct` is created by the [`values`] method on [`RankTree`].
///
/// [`values`]: RankTree::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, P: Position, V> {
    inner: Iter<'a, P, V>,
}

/// A mutable iterator over the values of a `RankTree`.
///
/// This `struct` is created by the [`values_mut`] method on [`RankTree`].
///
/// [`values_mut`]: RankTree::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, P: Position, V> {
    inner: IterMut<'a, P, V>,
}

/// An owning iterator over the values of a `RankTree`.
///
/// This `struct` is created by the [`into_values`] method on [`RankTree`].
///
/// [`into_values`]: RankTree::into_values
pub struct IntoValues<P: Position, V> {
    inner: IntoIter<P, V>,
}

impl<P: Position, V> RankTree<P, V> {
    /// Makes a new, empty `RankTree` that grows through the global allocator.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// tree.insert(3i64, 'c');
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<P: Position, V, A> RankTree<P, V, A> {
    /// Makes a new, empty `RankTree` whose node arena grows through `allocator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Bounded, RankTree};
    ///
    /// let tree: RankTree<u32, &str, _> = RankTree::new_in(Bounded::new(64));
    /// assert_eq!(tree.allocator().limit(), 64);
    /// ```
    #[must_use]
    pub const fn new_in(allocator: A) -> Self {
        Self {
            raw: RawRankTree::new_in(allocator),
        }
    }

    /// Returns the allocation strategy.
    #[must_use]
    pub const fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Returns the number of entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every entry.
    ///
    /// Nodes are released by clearing the arena, never by walking the tree.
    ///
    /// # Complexity
    ///
    /// O(n) to drop the values; O(1) otherwise.
    pub fn clear(&mut self) {
        tracing::trace!(len = self.len(), "clear");
        self.raw.clear();
    }

    /// Returns a reference to the value at `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(1u16, "a")]);
    /// assert_eq!(tree.get(1), Some(&"a"));
    /// assert_eq!(tree.get(2), None);
    /// ```
    #[must_use]
    pub fn get(&self, position: P) -> Option<&V> {
        self.raw.find(position).map(|handle| self.raw.value(handle))
    }

    /// Returns a mutable reference to the value at `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut(&mut self, position: P) -> Option<&mut V> {
        let handle = self.raw.find(position)?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns `true` if an entry exists at `position`.
    #[must_use]
    pub fn contains(&self, position: P) -> bool {
        self.raw.find(position).is_some()
    }

    fn entry_at(&self, handle: Handle) -> (P, &V) {
        (P::from_delta(self.raw.position_of(handle)), self.raw.value(handle))
    }

    /// Returns the entry with the lowest position.
    ///
    /// # Complexity
    ///
    /// O(1) to find the node, O(log n) to recover its position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(5i32, 'x'), (-3, 'y')]);
    /// assert_eq!(tree.first(), Some((-3, &'y')));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<(P, &V)> {
        self.raw.leftmost().map(|handle| self.entry_at(handle))
    }

    /// Returns the entry with the highest position.
    #[must_use]
    pub fn last(&self) -> Option<(P, &V)> {
        self.raw.rightmost().map(|handle| self.entry_at(handle))
    }

    /// Removes and returns the entry with the lowest position.
    pub fn pop_first(&mut self) -> Option<(P, V)> {
        let handle = self.raw.leftmost()?;
        let position = P::from_delta(self.raw.position_of(handle));
        Some((position, self.raw.remove_node(handle)))
    }

    /// Removes and returns the entry with the highest position.
    pub fn pop_last(&mut self) -> Option<(P, V)> {
        let handle = self.raw.rightmost()?;
        let position = P::from_delta(self.raw.position_of(handle));
        Some((position, self.raw.remove_node(handle)))
    }

    /// Removes the entry at `position`, returning its value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::from([(1usize, "a"), (2, "b")]);
    /// assert_eq!(tree.remove(1), Some("a"));
    /// assert_eq!(tree.remove(1), None);
    /// ```
    pub fn remove(&mut self, position: P) -> Option<V> {
        let handle = self.raw.find(position)?;
        Some(self.raw.remove_node(handle))
    }

    /// Removes the entry at `position`, returning the position and the value.
    pub fn remove_entry(&mut self, position: P) -> Option<(P, V)> {
        self.remove(position).map(|value| (position, value))
    }

    /// Adds `by` to every position at or after `boundary`. Positions before
    /// `boundary` are unchanged.
    ///
    /// The shifted entries must not collide with or pass any entry that is not
    /// shifted; doing so is a logic error that debug builds catch with a panic.
    ///
    /// # Complexity
    ///
    /// O(log n), whatever the number of entries moved.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::from([(0u64, 'a'), (1, 'b'), (2, 'c')]);
    /// tree.shift_from(1, 10);
    /// assert_eq!(tree.positions().collect::<Vec<_>>(), [0, 11, 12]);
    ///
    /// // Shifting back restores every entry exactly.
    /// tree.shift_from(11, -10);
    /// assert_eq!(tree.positions().collect::<Vec<_>>(), [0, 1, 2]);
    /// ```
    pub fn shift_from(&mut self, boundary: P, by: P::Delta) {
        tracing::trace!(?boundary, ?by, len = self.len(), "shift_from");
        debug_assert!(
            self.shift_keeps_order(boundary, by, Side::Right),
            "`RankTree::shift_from()` - shift would reorder entries"
        );
        self.raw.shift_from(boundary, by);
    }

    /// Adds `by` to every position strictly before `boundary`. Positions at or
    /// after `boundary` are unchanged.
    ///
    /// The same ordering rule as [`shift_from`](Self::shift_from) applies.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::from([(10i32, 'a'), (20, 'b'), (30, 'c')]);
    /// tree.shift_before(30, -10);
    /// assert_eq!(tree.positions().collect::<Vec<_>>(), [0, 10, 30]);
    /// ```
    pub fn shift_before(&mut self, boundary: P, by: P::Delta) {
        tracing::trace!(?boundary, ?by, len = self.len(), "shift_before");
        debug_assert!(
            self.shift_keeps_order(boundary, by, Side::Left),
            "`RankTree::shift_before()` - shift would reorder entries"
        );
        self.raw.shift_before(boundary, by);
    }

    /// Whether shifting the entries on `side` of `boundary` by `by` leaves the
    /// last entry before the boundary below the first entry at or after it.
    fn shift_keeps_order(&self, boundary: P, by: P::Delta, side: Side) -> bool {
        let boundary = boundary.to_delta();
        let below = self.raw.highest_where(|position| position < boundary);
        let above = self.raw.lowest_where(|position| position >= boundary);
        match (below, above) {
            (Some((_, below)), Some((_, above))) => match side {
                Side::Right => below < above + by,
                Side::Left => below + by < above,
            },
            _ => true,
        }
    }

    /// Moves the entry at `from` to `to`, provided `to` stays strictly between
    /// the entry's neighbours. Returns `false`, changing nothing, if there is no
    /// entry at `from` or the move would reorder entries.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::from([(0u32, 'a'), (10, 'b'), (20, 'c')]);
    /// assert!(tree.move_entry(10, 15));
    /// assert_eq!(tree.get(15), Some(&'b'));
    /// assert!(!tree.move_entry(15, 20));
    /// ```
    pub fn move_entry(&mut self, from: P, to: P) -> bool {
        let Some(handle) = self.raw.find(from) else {
            return false;
        };
        let (from, to) = (from.to_delta(), to.to_delta());
        let mut before = from;
        if self.raw.step(handle, &mut before, Side::Left).is_some() && to <= before {
            return false;
        }
        let mut after = from;
        if self.raw.step(handle, &mut after, Side::Right).is_some() && to >= after {
            return false;
        }
        self.raw.move_node(handle, to - from);
        true
    }

    /// Gets an iterator over the entries, in position order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(2u8, 'b'), (1, 'a')]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some((1, &'a')));
    /// assert_eq!(iter.next_back(), Some((2, &'b')));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, P, V> {
        Iter {
            nodes: self.raw.nodes(),
            values: self.raw.values(),
            walk: self.raw.walk(),
            remaining: self.len(),
        }
    }

    /// Gets a mutable iterator over the entries, in position order.
    pub fn iter_mut(&mut self) -> IterMut<'_, P, V> {
        let Iter { walk, remaining, .. } = self.iter();
        let (nodes, values) = self.raw.split_mut();
        IterMut {
            nodes,
            values: values.slots_mut_ptr(),
            walk,
            remaining,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the positions, in order.
    pub fn positions(&self) -> Positions<'_, P, V> {
        Positions { inner: self.iter() }
    }

    /// Gets an iterator over the values, in position order.
    pub fn values(&self) -> Values<'_, P, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values, in position order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, P, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Creates a consuming iterator over the values, in position order.
    pub fn into_values(self) -> IntoValues<P, V> {
        IntoValues { inner: self.into_iter() }
    }

    /// Verifies the tree's structural invariants: a black root, no red node with
    /// a red child, equal black height on every path, consistent parent links and
    /// caches, a matching length, strictly increasing positions, and no path more
    /// than twice as deep as another.
    ///
    /// Intended for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn check_structure(&self) -> Result<(), StructureError> {
        self.raw.check_structure()
    }
}

impl<P: Position, V, A: NodeAllocator> RankTree<P, V, A> {
    /// Inserts `value` at `position`, returning the value previously there.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses to make room for a new node.
    /// Use [`try_insert`](Self::try_insert) to handle that case.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut tree = RankTree::new();
    /// assert_eq!(tree.insert(37u32, "a"), None);
    /// assert_eq!(tree.insert(37, "b"), Some("a"));
    /// assert_eq!(tree[37], "b");
    /// ```
    pub fn insert(&mut self, position: P, value: V) -> Option<V> {
        self.raw.insert(position, value)
    }

    /// Inserts `value` at a free `position` and returns a reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Occupied`] if `position` already holds an entry, and
    /// [`InsertError::Alloc`] if the allocation strategy refuses to make room. The
    /// tree is unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{InsertError, RankTree};
    ///
    /// let mut tree = RankTree::new();
    /// assert_eq!(tree.try_insert(1u8, 'a'), Ok(&mut 'a'));
    /// assert_eq!(tree.try_insert(1, 'b'), Err(InsertError::Occupied));
    /// ```
    pub fn try_insert(&mut self, position: P, value: V) -> Result<&mut V, InsertError> {
        let handle = self.raw.try_insert_with(position, || Ok(value))?;
        Ok(self.raw.value_mut(handle))
    }

    /// Inserts the value produced by `make` at a free `position`.
    ///
    /// `make` is called only once the position is known to be free and room for
    /// the node is reserved, so a failure leaves the tree unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Occupied`], [`InsertError::Alloc`], or
    /// [`InsertError::Value`] with the error returned by `make`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{InsertError, RankTree};
    ///
    /// let mut tree: RankTree<u32, u32> = RankTree::new();
    /// let parsed = tree.try_insert_with(4, || "12".parse::<u32>());
    /// assert_eq!(parsed, Ok(&mut 12));
    ///
    /// let failed = tree.try_insert_with(5, || "x".parse::<u32>());
    /// assert!(matches!(failed, Err(InsertError::Value(_))));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn try_insert_with<E>(
        &mut self,
        position: P,
        make: impl FnOnce() -> Result<V, E>,
    ) -> Result<&mut V, InsertError<E>> {
        let handle = self.raw.try_insert_with(position, make)?;
        Ok(self.raw.value_mut(handle))
    }

    /// Gets the entry at `position` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let mut counts: RankTree<u16, usize> = RankTree::new();
    /// for position in [3, 1, 3, 3] {
    ///     *counts.entry(position).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts[3], 3);
    /// assert_eq!(counts[1], 1);
    /// ```
    pub fn entry(&mut self, position: P) -> Entry<'_, P, V, A> {
        match self.raw.search(position) {
            Search::Found(handle) => Entry::Occupied(OccupiedEntry {
                position,
                handle,
                tree: &mut self.raw,
            }),
            Search::Vacant(slot) => Entry::Vacant(VacantEntry {
                position,
                slot,
                tree: &mut self.raw,
            }),
        }
    }

    /// Exchanges the contents of two trees.
    ///
    /// Each tree keeps its own allocation strategy. When the strategies are
    /// compatible this is O(1); otherwise every entry is moved into storage
    /// granted by the receiving tree's strategy, O(n).
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if either strategy refuses the incoming entries.
    /// Neither tree is changed in that case.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocError> {
        self.raw.try_swap(&mut other.raw)
    }

    /// Exchanges the contents of two trees.
    ///
    /// # Panics
    ///
    /// Panics if the trees' strategies are incompatible and one of them refuses
    /// the other's entries. See [`try_swap`](Self::try_swap).
    pub fn swap(&mut self, other: &mut Self) {
        if let Err(err) = self.try_swap(other) {
            panic!("`RankTree::swap()` - {err}");
        }
    }
}

impl<P: Position, V: Clone, A: NodeAllocator + Clone> RankTree<P, V, A> {
    /// Clones the tree, reporting a refusal of the allocation strategy instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the strategy cannot hold a copy of every entry.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Ok(Self {
            raw: self.raw.try_clone()?,
        })
    }
}

impl<P: Position, V: Clone, A: NodeAllocator + Clone> Clone for RankTree<P, V, A> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<P: Position + Hash, V: Hash, A> Hash for RankTree<P, V, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (position, value) in self {
            position.hash(state);
            value.hash(state);
        }
    }
}

impl<P: Position, V: PartialEq, A> PartialEq for RankTree<P, V, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<P: Position, V: Eq, A> Eq for RankTree<P, V, A> {}

impl<P: Position, V: PartialOrd, A> PartialOrd for RankTree<P, V, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<P: Position, V: Ord, A> Ord for RankTree<P, V, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<P: Position, V: fmt::Debug, A> fmt::Debug for RankTree<P, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<P: Position, V, A: Default> Default for RankTree<P, V, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<P: Position, V, A: NodeAllocator + Default> FromIterator<(P, V)> for RankTree<P, V, A> {
    fn from_iter<T: IntoIterator<Item = (P, V)>>(iter: T) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<P: Position, V, A: NodeAllocator> Extend<(P, V)> for RankTree<P, V, A> {
    fn extend<T: IntoIterator<Item = (P, V)>>(&mut self, iter: T) {
        for (position, value) in iter {
            self.insert(position, value);
        }
    }
}

impl<P: Position, V, const N: usize> From<[(P, V); N]> for RankTree<P, V> {
    fn from(entries: [(P, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<P: Position, V, A> Index<P> for RankTree<P, V, A> {
    type Output = V;

    /// Returns a reference to the value at `position`.
    ///
    /// # Panics
    ///
    /// Panics if there is no entry at `position`.
    fn index(&self, position: P) -> &V {
        self.get(position).expect("`RankTree::index()` - no entry at position")
    }
}

impl<'a, P: Position, V, A> IntoIterator for &'a RankTree<P, V, A> {
    type Item = (P, &'a V);
    type IntoIter = Iter<'a, P, V>;

    fn into_iter(self) -> Iter<'a, P, V> {
        self.iter()
    }
}

impl<'a, P: Position, V, A> IntoIterator for &'a mut RankTree<P, V, A> {
    type Item = (P, &'a mut V);
    type IntoIter = IterMut<'a, P, V>;

    fn into_iter(self) -> IterMut<'a, P, V> {
        self.iter_mut()
    }
}

impl<P: Position, V, A> IntoIterator for RankTree<P, V, A> {
    type Item = (P, V);
    type IntoIter = IntoIter<P, V>;

    /// Gets an owning iterator over the entries, in position order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(3i8, 'c'), (1, 'a')]);
    /// assert_eq!(tree.into_iter().collect::<Vec<_>>(), [(1, 'a'), (3, 'c')]);
    /// ```
    fn into_iter(self) -> IntoIter<P, V> {
        let walk = self.raw.walk();
        let remaining = self.len();
        let (nodes, values) = self.raw.into_arenas();
        IntoIter {
            nodes,
            values,
            walk,
            remaining,
        }
    }
}

impl<'a, P: Position, V> Iterator for Iter<'a, P, V> {
    type Item = (P, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_front(self.nodes)?;
        self.remaining -= 1;
        Some((P::from_delta(position), self.values.get(self.nodes.get(handle).value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: Position, V> DoubleEndedIterator for Iter<'_, P, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_back(self.nodes)?;
        self.remaining -= 1;
        Some((P::from_delta(position), self.values.get(self.nodes.get(handle).value)))
    }
}

impl<P: Position, V> ExactSizeIterator for Iter<'_, P, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<P: Position, V> FusedIterator for Iter<'_, P, V> {}

impl<P: Position, V> Clone for Iter<'_, P, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<P: Position, V: fmt::Debug> fmt::Debug for Iter<'_, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, P: Position, V> IterMut<'a, P, V> {
    fn value(&self, handle: Handle) -> &'a mut V {
        // SAFETY: `values` was taken from the value arena, which the iterator borrows
        // mutably for 'a. The walk visits each node once, so no slot is handed out twice.
        unsafe { Arena::get_mut_raw(self.values, self.nodes.get(handle).value) }
    }
}

impl<'a, P: Position, V> Iterator for IterMut<'a, P, V> {
    type Item = (P, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_front(self.nodes)?;
        self.remaining -= 1;
        Some((P::from_delta(position), self.value(handle)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: Position, V> DoubleEndedIterator for IterMut<'_, P, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_back(self.nodes)?;
        self.remaining -= 1;
        Some((P::from_delta(position), self.value(handle)))
    }
}

impl<P: Position, V> ExactSizeIterator for IterMut<'_, P, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<P: Position, V> FusedIterator for IterMut<'_, P, V> {}

impl<P: Position, V> fmt::Debug for IterMut<'_, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<P: Position, V> IntoIter<P, V> {
    /// Moves the value out of a node the walk has just passed. The node links stay
    /// intact, so the rest of the walk is unaffected.
    fn take(&mut self, (handle, position): (Handle, P::Delta)) -> (P, V) {
        self.remaining -= 1;
        let value = self.nodes.get(handle).value;
        (P::from_delta(position), self.values.take(value))
    }
}

impl<P: Position, V> Iterator for IntoIter<P, V> {
    type Item = (P, V);

    fn next(&mut self) -> Option<(P, V)> {
        let found = self.walk.next_front(&self.nodes)?;
        Some(self.take(found))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: Position, V> DoubleEndedIterator for IntoIter<P, V> {
    fn next_back(&mut self) -> Option<(P, V)> {
        let found = self.walk.next_back(&self.nodes)?;
        Some(self.take(found))
    }
}

impl<P: Position, V> ExactSizeIterator for IntoIter<P, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<P: Position, V> FusedIterator for IntoIter<P, V> {}

impl<P: Position, V> fmt::Debug for IntoIter<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish()
    }
}

impl<P: Position, V> Iterator for Positions<'_, P, V> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.inner.next().map(|(position, _)| position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P: Position, V> DoubleEndedIterator for Positions<'_, P, V> {
    fn next_back(&mut self) -> Option<P> {
        self.inner.next_back().map(|(position, _)| position)
    }
}

impl<P: Position, V> ExactSizeIterator for Positions<'_, P, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P: Position, V> FusedIterator for Positions<'_, P, V> {}

impl<P: Position, V> Clone for Positions<'_, P, V> {
    fn clone(&self) -> Self {
        Positions {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, P: Position, V> Iterator for Values<'a, P, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P: Position, V> DoubleEndedIterator for Values<'_, P, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<P: Position, V> ExactSizeIterator for Values<'_, P, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P: Position, V> FusedIterator for Values<'_, P, V> {}

impl<P: Position, V> Clone for Values<'_, P, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Position, V: fmt::Debug> fmt::Debug for Values<'_, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, P: Position, V> Iterator for ValuesMut<'a, P, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P: Position, V> DoubleEndedIterator for ValuesMut<'_, P, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<P: Position, V> ExactSizeIterator for ValuesMut<'_, P, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P: Position, V> FusedIterator for ValuesMut<'_, P, V> {}

impl<P: Position, V> Iterator for IntoValues<P, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P: Position, V> DoubleEndedIterator for IntoValues<P, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<P: Position, V> ExactSizeIterator for IntoValues<P, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P: Position, V> FusedIterator for IntoValues<P, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iterators_meet_in_the_middle() {
        let tree: RankTree<u32, u32> = (0..9).map(|i| (i * 10, i)).collect();
        let mut iter = tree.iter();
        let mut seen = Vec::new();
        while let Some((position, _)) = iter.next() {
            seen.push(position);
            if let Some((position, _)) = iter.next_back() {
                seen.push(position);
            }
            assert_eq!(iter.len(), 9 - seen.len());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..9).map(|i| i * 10).collect::<Vec<_>>());
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_mut_visits_each_value_once() {
        let mut tree: RankTree<i16, u32> = (-50..50).map(|i| (i, 0)).collect();
        for (_, value) in &mut tree {
            *value += 1;
        }
        let mut back = tree.values_mut();
        while let Some(value) = back.next_back() {
            *value += 1;
        }
        assert!(tree.values().all(|&value| value == 2));
    }

    #[test]
    fn move_entry_stays_between_neighbours() {
        let mut tree = RankTree::from([(0u32, 'a'), (10, 'b'), (20, 'c')]);
        assert!(!tree.move_entry(10, 0));
        assert!(!tree.move_entry(10, 25));
        assert!(!tree.move_entry(5, 6));
        assert!(tree.move_entry(0, 9));
        assert!(tree.move_entry(20, 1000));
        assert_eq!(tree.positions().collect::<Vec<_>>(), [9, 10, 1000]);
        tree.check_structure().unwrap();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "shift would reorder entries")]
    fn shift_past_an_unshifted_entry() {
        let mut tree = RankTree::from([(0i32, ()), (10, ())]);
        tree.shift_from(5, -20);
    }

    #[test]
    fn pops_from_both_ends() {
        let mut tree = RankTree::from([(2u8, 'b'), (1, 'a'), (3, 'c')]);
        assert_eq!(tree.pop_first(), Some((1, 'a')));
        assert_eq!(tree.pop_last(), Some((3, 'c')));
        assert_eq!(tree.first(), tree.last());
        assert_eq!(tree.pop_last(), Some((2, 'b')));
        assert_eq!(tree.pop_first(), None);
    }
}
